//! Turns spec trees into live widget trees.
//!
//! Structural and type errors have already been rejected when a spec
//! exists; what remains here is the soft path: enumerated style strings
//! resolve leniently (warn + safe default), and signal wiring attaches the
//! configured actions. The factory retains nothing after `build` returns;
//! the parent widget owns every child it received.

use std::{cell::Cell, rc::Rc};

use serde_json::Value;
use shared::{
    domain::{Justification, Orientation, ScrollPolicy, Transition},
    error::ConfigError,
};
use toolkit::{ScrollDirection, Signal, SignalValue, Toolkit, WidgetRef};
use tracing::warn;

use crate::{
    action::Dispatcher,
    spec::{
        self, BoxSpec, ButtonSpec, CenterBoxSpec, CustomSpec, EntrySpec, IconSpec, LabelSpec,
        OverlaySpec, ProgressBarSpec, RevealerSpec, ScrollableSpec, SliderSpec, StackSpec,
        SwitchSpec, WidgetSpec,
    },
};

pub struct Factory {
    toolkit: Rc<dyn Toolkit>,
    dispatcher: Rc<Dispatcher>,
}

impl Factory {
    pub fn new(toolkit: Rc<dyn Toolkit>, dispatcher: Rc<Dispatcher>) -> Self {
        Self {
            toolkit,
            dispatcher,
        }
    }

    pub fn with_shell(toolkit: Rc<dyn Toolkit>) -> Self {
        Self::new(toolkit, Rc::new(Dispatcher::shell()))
    }

    /// Builds one widget (and, recursively, its children) from a spec.
    pub fn build(&self, spec: &WidgetSpec) -> WidgetRef {
        match spec {
            WidgetSpec::Box(s) => self.build_box(s),
            WidgetSpec::CenterBox(s) => self.build_center_box(s),
            WidgetSpec::Label(s) => self.build_label(s),
            WidgetSpec::Button(s) => self.build_button(s),
            WidgetSpec::Slider(s) => self.build_slider(s),
            WidgetSpec::Stack(s) => self.build_stack(s),
            WidgetSpec::Entry(s) => self.build_entry(s),
            WidgetSpec::Scrollable(s) => self.build_scrollable(s),
            WidgetSpec::Revealer(s) => self.build_revealer(s),
            WidgetSpec::Overlay(s) => self.build_overlay(s),
            WidgetSpec::ProgressBar(s) => self.build_progress_bar(s),
            WidgetSpec::Switch(s) => self.build_switch(s),
            WidgetSpec::Icon(s) => self.build_icon(s),
            WidgetSpec::Custom(s) => self.build_custom(s),
        }
    }

    /// Parse-then-build. Configuration errors surface synchronously and no
    /// widget is produced.
    pub fn build_value(&self, value: Value) -> Result<WidgetRef, ConfigError> {
        Ok(self.build(&spec::from_value(value)?))
    }

    pub fn build_json(&self, json: &str) -> Result<WidgetRef, ConfigError> {
        Ok(self.build(&spec::from_json(json)?))
    }

    fn build_box(&self, s: &BoxSpec) -> WidgetRef {
        let widget = self.toolkit.create_box();
        widget.set_orientation(orientation_or_default(&s.orientation));
        widget.set_spacing(s.spacing);
        widget.set_homogeneous(s.homogeneous);
        for child in &s.children {
            let built = self.build(child);
            widget.append(&built);
        }
        widget
    }

    fn build_center_box(&self, s: &CenterBoxSpec) -> WidgetRef {
        let widget = self.toolkit.create_center_box();
        if let Some(raw) = &s.orientation {
            widget.set_orientation(orientation_or_default(raw));
        }
        if let Some(start) = &s.start {
            let built = self.build(start);
            widget.set_slot(toolkit::Slot::Start, &built);
        }
        if let Some(center) = &s.center {
            let built = self.build(center);
            widget.set_slot(toolkit::Slot::Center, &built);
        }
        if let Some(end) = &s.end {
            let built = self.build(end);
            widget.set_slot(toolkit::Slot::End, &built);
        }
        widget
    }

    fn build_label(&self, s: &LabelSpec) -> WidgetRef {
        let widget = self.toolkit.create_label();
        widget.set_markup(s.markup);
        widget.set_text(&s.text);
        if let Some(raw) = &s.justify {
            match raw.parse::<Justification>() {
                Ok(justify) => widget.set_justify(justify),
                Err(error) => warn!(%error, "invalid label justify, keeping default"),
            }
        }
        widget.set_wrap(s.wrap);
        if let Some(xalign) = s.xalign {
            widget.set_xalign(xalign);
        }
        if let Some(yalign) = s.yalign {
            widget.set_yalign(yalign);
        }
        widget
    }

    fn build_button(&self, s: &ButtonSpec) -> WidgetRef {
        let widget = self.toolkit.create_button();
        if let Some(child) = &s.child {
            let built = self.build(child);
            widget.set_child(&built);
        }
        if !s.on_click.is_none() {
            let dispatcher = self.dispatcher.clone();
            let action = s.on_click.clone();
            widget.connect(
                Signal::Clicked,
                Rc::new(move |button, _| dispatcher.dispatch(&action, button, None)),
            );
        }
        widget
    }

    fn build_slider(&self, s: &SliderSpec) -> WidgetRef {
        let widget = self.toolkit.create_slider();
        widget.set_range(s.min, s.max);
        widget.set_draw_value(s.draw_value);
        widget.set_value(s.value);

        // Change dispatch is gated on direct manipulation: pressed sets the
        // flag, released clears it, and a wheel step holds it for exactly
        // the duration of the nudge. Programmatic value changes stay silent.
        let dragging = Rc::new(Cell::new(false));
        {
            let dragging = dragging.clone();
            widget.connect(Signal::Pressed, Rc::new(move |_, _| dragging.set(true)));
        }
        {
            let dragging = dragging.clone();
            widget.connect(Signal::Released, Rc::new(move |_, _| dragging.set(false)));
        }
        {
            let dragging = dragging.clone();
            let step = (s.max - s.min) / 100.0;
            widget.connect(
                Signal::Scrolled,
                Rc::new(move |slider, value| {
                    let direction = match value {
                        Some(SignalValue::Scroll(direction)) => *direction,
                        _ => return,
                    };
                    let delta = match direction {
                        ScrollDirection::Down => step,
                        ScrollDirection::Up => -step,
                    };
                    dragging.set(true);
                    slider.set_value(slider.value() + delta);
                    dragging.set(false);
                }),
            );
        }
        if !s.on_change.is_none() {
            let dragging = dragging.clone();
            let dispatcher = self.dispatcher.clone();
            let action = s.on_change.clone();
            widget.connect(
                Signal::ValueChanged,
                Rc::new(move |slider, value| {
                    if !dragging.get() {
                        return;
                    }
                    let payload = match value {
                        Some(SignalValue::Float(new_value)) => SignalValue::Float(*new_value),
                        _ => SignalValue::Float(slider.value()),
                    };
                    dispatcher.dispatch(&action, slider, Some(&payload));
                }),
            );
        }
        widget
    }

    fn build_stack(&self, s: &StackSpec) -> WidgetRef {
        let widget = self.toolkit.create_stack();
        for item in &s.items {
            let built = self.build(&item.child);
            widget.add_named(&built, &item.name);
        }
        widget
    }

    fn build_entry(&self, s: &EntrySpec) -> WidgetRef {
        let widget = self.toolkit.create_entry();
        if let Some(placeholder) = &s.placeholder {
            widget.set_placeholder(placeholder);
        }
        widget.set_input_visibility(s.visibility);
        widget.set_text(&s.text);
        if !s.on_accept.is_none() {
            let dispatcher = self.dispatcher.clone();
            let action = s.on_accept.clone();
            widget.connect(
                Signal::Activated,
                Rc::new(move |entry, _| {
                    let payload = SignalValue::Text(entry.text());
                    dispatcher.dispatch(&action, entry, Some(&payload));
                }),
            );
        }
        if !s.on_change.is_none() {
            let dispatcher = self.dispatcher.clone();
            let action = s.on_change.clone();
            widget.connect(
                Signal::TextChanged,
                Rc::new(move |entry, value| {
                    let payload = match value {
                        Some(SignalValue::Text(text)) => SignalValue::Text(text.clone()),
                        _ => SignalValue::Text(entry.text()),
                    };
                    dispatcher.dispatch(&action, entry, Some(&payload));
                }),
            );
        }
        widget
    }

    fn build_scrollable(&self, s: &ScrollableSpec) -> WidgetRef {
        let widget = self.toolkit.create_scrollable();
        if let Some(child) = &s.child {
            let built = self.build(child);
            widget.set_child(&built);
        }
        let horizontal = policy_or_unset(s.hscroll.as_deref(), "hscroll");
        let vertical = policy_or_unset(s.vscroll.as_deref(), "vscroll");
        widget.set_scroll_policy(horizontal, vertical);
        widget
    }

    fn build_revealer(&self, s: &RevealerSpec) -> WidgetRef {
        let widget = self.toolkit.create_revealer();
        if let Some(child) = &s.child {
            let built = self.build(child);
            widget.set_child(&built);
        }
        if let Some(raw) = &s.transition {
            match raw.parse::<Transition>() {
                Ok(transition) => widget.set_transition(transition),
                Err(error) => warn!(%error, "invalid revealer transition, keeping default"),
            }
        }
        widget.set_transition_duration_ms(s.transition_duration_ms);
        widget.set_reveal_child(s.reveal_child);
        widget
    }

    fn build_overlay(&self, s: &OverlaySpec) -> WidgetRef {
        let widget = self.toolkit.create_overlay();
        let mut children = s.children.iter();
        if let Some(base) = children.next() {
            let built = self.build(base);
            widget.set_child(&built);
        }
        for overlay in children {
            let built = self.build(overlay);
            widget.add_overlay(&built);
            if s.passthrough {
                widget.set_overlay_passthrough(&built, true);
            }
        }
        widget
    }

    fn build_progress_bar(&self, s: &ProgressBarSpec) -> WidgetRef {
        let widget = self.toolkit.create_progress_bar();
        widget.set_fraction(s.fraction);
        widget
    }

    fn build_switch(&self, s: &SwitchSpec) -> WidgetRef {
        let widget = self.toolkit.create_switch();
        widget.set_active(s.active);
        if !s.on_activate.is_none() {
            let dispatcher = self.dispatcher.clone();
            let action = s.on_activate.clone();
            widget.connect(
                Signal::SwitchToggled,
                Rc::new(move |switch, value| {
                    let payload = match value {
                        Some(SignalValue::Bool(active)) => SignalValue::Bool(*active),
                        _ => SignalValue::Bool(switch.is_active()),
                    };
                    dispatcher.dispatch(&action, switch, Some(&payload));
                }),
            );
        }
        widget
    }

    fn build_icon(&self, s: &IconSpec) -> WidgetRef {
        let widget = self.toolkit.create_icon();
        widget.set_icon_name(&s.icon);
        if let Some(size) = s.size {
            widget.set_pixel_size(size);
        }
        widget
    }

    fn build_custom(&self, s: &CustomSpec) -> WidgetRef {
        (s.constructor)(self.toolkit.as_ref())
    }
}

/// Stack page selector: a literal page name, or a thunk resolved at call
/// time.
#[derive(Clone)]
pub enum PageTarget {
    Name(String),
    Thunk(Rc<dyn Fn() -> String>),
}

impl PageTarget {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn thunk(resolve: impl Fn() -> String + 'static) -> Self {
        Self::Thunk(Rc::new(resolve))
    }
}

/// Switches the visible page of a stack widget.
pub fn show_child(stack: &WidgetRef, target: &PageTarget) {
    let name = match target {
        PageTarget::Name(name) => name.clone(),
        PageTarget::Thunk(resolve) => resolve(),
    };
    stack.set_visible_child_name(&name);
}

fn orientation_or_default(raw: &str) -> Orientation {
    raw.parse().unwrap_or_else(|error| {
        warn!(%error, "unrecognized orientation, using horizontal");
        Orientation::Horizontal
    })
}

fn policy_or_unset(raw: Option<&str>, axis: &str) -> Option<ScrollPolicy> {
    let raw = raw?;
    match raw.parse::<ScrollPolicy>() {
        Ok(policy) => Some(policy),
        Err(error) => {
            warn!(%error, axis, "invalid scroll policy, leaving unset");
            None
        }
    }
}

#[cfg(test)]
#[path = "tests/factory_tests.rs"]
mod tests;
