//! Judges and projects taking part in the fair.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::text::to_title_case;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("cannot open roster: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed roster: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judge {
    pub id: String,
    pub name: String,
    pub email_user: String,
    pub email_domain: String,
}

impl Judge {
    pub fn email(&self) -> String {
        format!("{}@{}", self.email_user, self.email_domain)
    }

    /// Name as shown in the form, title cased.
    pub fn display_name(&self) -> String {
        to_title_case(&self.name, true)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    /// Team code such as `G1`.
    pub team: String,
    /// Ids of the judges assigned to this project.
    #[serde(default)]
    pub judges: Vec<String>,
    /// The organisers hold remarks about this team.
    #[serde(default)]
    pub has_remarks: bool,
}

impl Project {
    pub fn is_assigned_to(&self, judge: &Judge) -> bool {
        self.judges.iter().any(|id| *id == judge.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub judges: Vec<Judge>,
    pub projects: Vec<Project>,
}

impl Roster {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RosterError> {
        Self::from_reader(File::open(path)?)
    }

    pub fn from_reader(r: impl Read) -> Result<Self, RosterError> {
        Ok(serde_json::from_reader(BufReader::new(r))?)
    }

    pub fn judge_by_email(&self, email: &str) -> Option<&Judge> {
        let (user, domain) = email.split_once('@')?;
        self.judges
            .iter()
            .find(|judge| judge.email_user == user && judge.email_domain == domain)
    }

    /// Looks a judge up by display name, falling back to the raw name.
    pub fn judge_by_name(&self, name: &str) -> Option<&Judge> {
        self.judges
            .iter()
            .find(|judge| judge.display_name() == name || judge.name == name)
    }

    pub fn project_by_title(&self, title: &str) -> Option<&Project> {
        self.projects.iter().find(|project| project.title == title)
    }

    /// Team codes are matched ignoring case, `g1` finds `G1`.
    pub fn project_by_team(&self, team: &str) -> Option<&Project> {
        let team = team.to_uppercase();
        self.projects.iter().find(|project| project.team.to_uppercase() == team)
    }

    pub fn emails(&self) -> Vec<String> {
        self.judges.iter().map(Judge::email).collect()
    }

    pub fn display_names(&self) -> Vec<String> {
        self.judges.iter().map(Judge::display_name).collect()
    }

    pub fn teams(&self) -> Vec<String> {
        self.projects.iter().map(|project| project.team.clone()).unique().collect()
    }

    /// Projects a judge should see: the ones assigned to them, or all of them
    /// when no judge is given.
    pub fn projects_for<'a>(&'a self, judge: Option<&'a Judge>) -> Vec<&'a Project> {
        self.projects
            .iter()
            .filter(|project| judge.map_or(true, |judge| project.is_assigned_to(judge)))
            .collect()
    }
}
