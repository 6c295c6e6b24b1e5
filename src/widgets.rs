use std::hash::Hash;

use eframe::egui::{
    Align, Button, Frame, Key, Modifiers, Rect, RichText, ScrollArea, Slider, TextEdit, Ui,
};

use fairjudge::choice::{ChoiceEvent, ChoiceList, Effect, ListView, NavKey};
use fairjudge::score::ScoreScale;

const NAV_KEYS: [(Key, NavKey); 4] = [
    (Key::ArrowDown, NavKey::Down),
    (Key::ArrowUp, NavKey::Up),
    (Key::Enter, NavKey::Enter),
    (Key::Escape, NavKey::Escape),
];

/// Feeds events into a choice list while tracking the value it asked for, so
/// later events in the same frame see the new value.
struct Driver<'a> {
    list: &'a mut ChoiceList,
    value: String,
    changed: bool,
    focus: bool,
}

impl Driver<'_> {
    fn send(&mut self, event: ChoiceEvent) {
        for effect in self.list.handle(&self.value, event) {
            match effect {
                Effect::Change(value) => {
                    self.value = value;
                    self.changed = true;
                }
                Effect::FocusInput => self.focus = true,
                Effect::Consumed => {}
            }
        }
    }
}

/// Text input with a filterable list of candidates below it. Returns the new
/// value when the field asks for a change.
pub fn choice_field(
    ui: &mut Ui,
    id_source: impl Hash,
    label: &str,
    hint: &str,
    value: &str,
    list: &mut ChoiceList,
) -> Option<String> {
    let id = ui.make_persistent_id(id_source);
    list.sync(value);

    let mut driver = Driver {
        list,
        value: value.to_string(),
        changed: false,
        focus: false,
    };

    // keys must be taken before the text edit sees them, enter and escape
    // would otherwise drop the focus
    let mut navigated = false;
    if ui.memory(|m| m.has_focus(id)) && driver.list.is_open() {
        for (key, nav) in NAV_KEYS {
            if ui.input_mut(|i| i.consume_key(Modifiers::NONE, key)) {
                driver.send(ChoiceEvent::Key(nav));
                navigated = true;
            }
        }
    }

    ui.label(RichText::new(label).strong());

    let mut clear_rect: Option<Rect> = None;
    let input = ui.horizontal(|ui| {
        let mut text = driver.value.clone();
        let response = ui.add(
            TextEdit::singleline(&mut text)
                .id(id)
                .hint_text(hint)
                .desired_width(ui.available_width() - 32.0),
        );

        if response.gained_focus() || response.clicked() {
            driver.send(ChoiceEvent::Focus);
        }

        if response.changed() {
            driver.send(ChoiceEvent::Edit(text));
        }

        if driver.list.view().show_clear {
            let clear = ui.small_button("x").on_hover_text("Clear");
            clear_rect = Some(clear.rect);
            if clear.clicked() {
                driver.send(ChoiceEvent::Clear);
            }
        }

        response.rect
    });
    let input_rect = input.inner;

    let mut pending = Vec::new();
    let list_rect = match driver.list.view().list {
        ListView::Hidden => None,

        ListView::NoResults => {
            let frame = Frame::group(ui.style()).show(ui, |ui| {
                ui.label(RichText::new("No results found").weak());
            });
            Some(frame.response.rect)
        }

        ListView::Rows(rows) => {
            let pointer_moving = ui.input(|i| i.pointer.is_moving());
            let frame = Frame::group(ui.style()).show(ui, |ui| {
                ScrollArea::vertical()
                    .id_source(id.with("rows"))
                    .max_height(180.0)
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        for (idx, row) in rows.iter().enumerate() {
                            let response = ui.selectable_label(row.highlighted, row.text);

                            if row.highlighted && navigated {
                                response.scroll_to_me(Some(Align::Center));
                            }

                            if response.hovered() && pointer_moving && !row.highlighted {
                                pending.push(ChoiceEvent::Hover(idx));
                            }

                            if response.clicked() {
                                pending.push(ChoiceEvent::Click(idx));
                            }
                        }
                    });
            });
            Some(frame.response.rect)
        }
    };

    for event in pending {
        driver.send(event);
    }

    let pressed_outside = ui.input(|i| {
        i.pointer.any_pressed()
            && i.pointer.interact_pos().is_some_and(|pos| {
                !input_rect.contains(pos)
                    && !clear_rect.is_some_and(|rect| rect.contains(pos))
                    && !list_rect.is_some_and(|rect| rect.contains(pos))
            })
    });

    if pressed_outside && driver.list.is_open() {
        driver.send(ChoiceEvent::PointerDownOutside);
    }

    if driver.focus {
        ui.memory_mut(|m| m.request_focus(id));
    }

    driver.changed.then_some(driver.value)
}

/// Score stepper: minus button, text input with a slider underneath, plus
/// button. Returns the new value when it changed.
pub fn score_field(ui: &mut Ui, label: &str, value: &str, scale: &ScoreScale) -> Option<String> {
    let mut changed = None;

    ui.label(RichText::new(label).strong());

    ui.horizontal(|ui| {
        let minus = ui
            .add_enabled(scale.can_decrement(value), Button::new(" - "))
            .on_hover_text("Decrease by 0,1");
        if minus.clicked() {
            changed = scale.decrement(value);
        }

        ui.vertical(|ui| {
            let mut text = value.to_string();
            let input = ui.add(TextEdit::singleline(&mut text).hint_text("0,0").desired_width(140.0));
            if input.changed() {
                if let Some(accepted) = scale.edit(&text) {
                    changed = Some(accepted);
                }
            }

            let mut position = scale.slider_position(value);
            let slider = ui.add(
                Slider::new(&mut position, 0.0..=scale.max().as_f32())
                    .step_by(0.1)
                    .fixed_decimals(1)
                    .show_value(false),
            );
            if slider.changed() {
                changed = Some(scale.from_slider(position));
            }
        });

        let plus = ui
            .add_enabled(scale.can_increment(value), Button::new(" + "))
            .on_hover_text("Increase by 0,1");
        if plus.clicked() {
            changed = scale.increment(value);
        }
    });

    ui.label(RichText::new(format!("Scores from 0 to {} with one decimal", scale.max())).small());

    changed
}
