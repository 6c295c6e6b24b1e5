use thiserror::Error;

pub use script::ScriptEndpoint;
pub use validate::{HttpPasswordGate, ValidateRequest, ValidateResponse};

use crate::form::Submission;

mod script;
mod validate;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("no {0} endpoint configured")]
    NotConfigured(&'static str),

    #[error("server answered with status {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Transport(#[from] Box<ureq::Transport>),

    #[error("unreadable response: {0}")]
    Body(#[from] std::io::Error),
}

impl From<ureq::Error> for RemoteError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, _) => RemoteError::Status(code),
            ureq::Error::Transport(transport) => RemoteError::Transport(Box::new(transport)),
        }
    }
}

/// Confirms the shared password before any score leaves the form.
pub trait PasswordGate: Send + Sync {
    fn validate(&self, password: &str) -> Result<bool, RemoteError>;
}

/// Receives finished evaluations.
pub trait ScoreSink: Send + Sync {
    /// Dispatches one evaluation. `Ok` means the request went out, not that
    /// it was stored.
    fn submit(&self, submission: &Submission) -> Result<(), RemoteError>;
}

#[cfg(test)]
pub(crate) mod tests {
    use std::net::TcpListener;
    use std::thread::spawn;

    use axum::Router;

    /// Serves `app` on a free local port from a background runtime and
    /// returns its base URL.
    pub(crate) fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        listener.set_nonblocking(true).unwrap();

        spawn(move || {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                axum::serve(listener, app).await.unwrap();
            });
        });

        format!("http://{address}")
    }
}
