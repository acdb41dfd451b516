//! Render-less in-memory backend.
//!
//! Retains the full widget tree, records every property, and delivers
//! signals synchronously in connection order. Used by the factory tests and
//! by binaries that only need the composition semantics, not pixels.

use std::{
    any::Any,
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
};

use shared::domain::{Justification, Orientation, ScrollPolicy, Transition};

use crate::{
    Signal, SignalHandle, SignalHandler, SignalValue, Slot, Toolkit, Widget, WidgetKind, WidgetRef,
};

#[derive(Default)]
pub struct HeadlessToolkit;

impl HeadlessToolkit {
    pub fn new() -> Rc<Self> {
        Rc::new(Self)
    }
}

impl Toolkit for HeadlessToolkit {
    fn create_box(&self) -> WidgetRef {
        HeadlessWidget::create(WidgetKind::Box)
    }

    fn create_center_box(&self) -> WidgetRef {
        HeadlessWidget::create(WidgetKind::CenterBox)
    }

    fn create_label(&self) -> WidgetRef {
        HeadlessWidget::create(WidgetKind::Label)
    }

    fn create_button(&self) -> WidgetRef {
        HeadlessWidget::create(WidgetKind::Button)
    }

    fn create_slider(&self) -> WidgetRef {
        HeadlessWidget::create(WidgetKind::Slider)
    }

    fn create_stack(&self) -> WidgetRef {
        HeadlessWidget::create(WidgetKind::Stack)
    }

    fn create_entry(&self) -> WidgetRef {
        HeadlessWidget::create(WidgetKind::Entry)
    }

    fn create_scrollable(&self) -> WidgetRef {
        HeadlessWidget::create(WidgetKind::Scrollable)
    }

    fn create_revealer(&self) -> WidgetRef {
        HeadlessWidget::create(WidgetKind::Revealer)
    }

    fn create_overlay(&self) -> WidgetRef {
        HeadlessWidget::create(WidgetKind::Overlay)
    }

    fn create_progress_bar(&self) -> WidgetRef {
        HeadlessWidget::create(WidgetKind::ProgressBar)
    }

    fn create_switch(&self) -> WidgetRef {
        HeadlessWidget::create(WidgetKind::Switch)
    }

    fn create_icon(&self) -> WidgetRef {
        HeadlessWidget::create(WidgetKind::Icon)
    }
}

struct WidgetState {
    children: Vec<WidgetRef>,
    child: Option<WidgetRef>,
    slots: [Option<WidgetRef>; 3],
    named: Vec<(String, WidgetRef)>,
    visible_child: Option<String>,
    overlays: Vec<(WidgetRef, bool)>,
    orientation: Orientation,
    spacing: i32,
    homogeneous: bool,
    text: String,
    markup: bool,
    justify: Option<Justification>,
    wrap: bool,
    xalign: Option<f64>,
    yalign: Option<f64>,
    min: f64,
    max: f64,
    value: f64,
    draw_value: bool,
    placeholder: String,
    input_visible: bool,
    hscroll: Option<ScrollPolicy>,
    vscroll: Option<ScrollPolicy>,
    transition: Option<Transition>,
    transition_duration_ms: u32,
    reveal_child: bool,
    fraction: f64,
    active: bool,
    icon_name: String,
    pixel_size: Option<i32>,
}

impl Default for WidgetState {
    fn default() -> Self {
        Self {
            children: Vec::new(),
            child: None,
            slots: [None, None, None],
            named: Vec::new(),
            visible_child: None,
            overlays: Vec::new(),
            orientation: Orientation::Horizontal,
            spacing: 0,
            homogeneous: false,
            text: String::new(),
            markup: false,
            justify: None,
            wrap: false,
            xalign: None,
            yalign: None,
            min: 0.0,
            max: 1.0,
            value: 0.0,
            draw_value: false,
            placeholder: String::new(),
            input_visible: true,
            hscroll: None,
            vscroll: None,
            transition: None,
            transition_duration_ms: 250,
            reveal_child: false,
            fraction: 0.0,
            active: false,
            icon_name: String::new(),
            pixel_size: None,
        }
    }
}

pub struct HeadlessWidget {
    kind: WidgetKind,
    state: RefCell<WidgetState>,
    handlers: RefCell<Vec<(Signal, u64, SignalHandler)>>,
    next_handler: Cell<u64>,
    self_weak: Weak<HeadlessWidget>,
}

impl HeadlessWidget {
    fn create(kind: WidgetKind) -> WidgetRef {
        Rc::new_cyclic(|weak: &Weak<HeadlessWidget>| HeadlessWidget {
            kind,
            state: RefCell::new(WidgetState::default()),
            handlers: RefCell::new(Vec::new()),
            next_handler: Cell::new(0),
            self_weak: weak.clone(),
        })
    }

    fn slot_index(slot: Slot) -> usize {
        match slot {
            Slot::Start => 0,
            Slot::Center => 1,
            Slot::End => 2,
        }
    }

    // Inspection surface for tests and tree walkers.

    pub fn children(&self) -> Vec<WidgetRef> {
        self.state.borrow().children.clone()
    }

    pub fn child(&self) -> Option<WidgetRef> {
        self.state.borrow().child.clone()
    }

    pub fn slot(&self, slot: Slot) -> Option<WidgetRef> {
        self.state.borrow().slots[Self::slot_index(slot)].clone()
    }

    pub fn named_pages(&self) -> Vec<String> {
        self.state
            .borrow()
            .named
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn overlays(&self) -> Vec<WidgetRef> {
        self.state
            .borrow()
            .overlays
            .iter()
            .map(|(widget, _)| widget.clone())
            .collect()
    }

    pub fn overlay_passthrough(&self, child: &WidgetRef) -> Option<bool> {
        self.state
            .borrow()
            .overlays
            .iter()
            .find(|(widget, _)| Rc::ptr_eq(widget, child))
            .map(|(_, passthrough)| *passthrough)
    }

    pub fn spacing(&self) -> i32 {
        self.state.borrow().spacing
    }

    pub fn homogeneous(&self) -> bool {
        self.state.borrow().homogeneous
    }

    pub fn markup(&self) -> bool {
        self.state.borrow().markup
    }

    pub fn justify(&self) -> Option<Justification> {
        self.state.borrow().justify
    }

    pub fn wrap(&self) -> bool {
        self.state.borrow().wrap
    }

    pub fn range(&self) -> (f64, f64) {
        let state = self.state.borrow();
        (state.min, state.max)
    }

    pub fn draw_value(&self) -> bool {
        self.state.borrow().draw_value
    }

    pub fn placeholder(&self) -> String {
        self.state.borrow().placeholder.clone()
    }

    pub fn scroll_policies(&self) -> (Option<ScrollPolicy>, Option<ScrollPolicy>) {
        let state = self.state.borrow();
        (state.hscroll, state.vscroll)
    }

    pub fn transition(&self) -> Option<Transition> {
        self.state.borrow().transition
    }

    pub fn transition_duration_ms(&self) -> u32 {
        self.state.borrow().transition_duration_ms
    }

    pub fn reveal_child(&self) -> bool {
        self.state.borrow().reveal_child
    }

    pub fn fraction(&self) -> f64 {
        self.state.borrow().fraction
    }

    pub fn icon_name(&self) -> String {
        self.state.borrow().icon_name.clone()
    }

    pub fn pixel_size(&self) -> Option<i32> {
        self.state.borrow().pixel_size
    }
}

impl Widget for HeadlessWidget {
    fn kind(&self) -> WidgetKind {
        self.kind
    }

    fn append(&self, child: &WidgetRef) {
        self.state.borrow_mut().children.push(child.clone());
    }

    fn set_child(&self, child: &WidgetRef) {
        self.state.borrow_mut().child = Some(child.clone());
    }

    fn set_slot(&self, slot: Slot, child: &WidgetRef) {
        self.state.borrow_mut().slots[Self::slot_index(slot)] = Some(child.clone());
    }

    fn add_named(&self, child: &WidgetRef, name: &str) {
        let mut state = self.state.borrow_mut();
        if state.visible_child.is_none() {
            state.visible_child = Some(name.to_string());
        }
        state.named.push((name.to_string(), child.clone()));
    }

    fn set_visible_child_name(&self, name: &str) {
        let mut state = self.state.borrow_mut();
        if state.named.iter().any(|(page, _)| page == name) {
            state.visible_child = Some(name.to_string());
        }
    }

    fn visible_child_name(&self) -> Option<String> {
        self.state.borrow().visible_child.clone()
    }

    fn add_overlay(&self, child: &WidgetRef) {
        self.state.borrow_mut().overlays.push((child.clone(), false));
    }

    fn set_overlay_passthrough(&self, child: &WidgetRef, passthrough: bool) {
        let mut state = self.state.borrow_mut();
        if let Some(entry) = state
            .overlays
            .iter_mut()
            .find(|(widget, _)| Rc::ptr_eq(widget, child))
        {
            entry.1 = passthrough;
        }
    }

    fn set_orientation(&self, orientation: Orientation) {
        self.state.borrow_mut().orientation = orientation;
    }

    fn orientation(&self) -> Orientation {
        self.state.borrow().orientation
    }

    fn set_spacing(&self, spacing: i32) {
        self.state.borrow_mut().spacing = spacing;
    }

    fn set_homogeneous(&self, homogeneous: bool) {
        self.state.borrow_mut().homogeneous = homogeneous;
    }

    fn set_text(&self, text: &str) {
        let changed = {
            let mut state = self.state.borrow_mut();
            if state.text == text {
                false
            } else {
                state.text = text.to_string();
                true
            }
        };
        if changed {
            self.emit(Signal::TextChanged, Some(SignalValue::Text(text.to_string())));
        }
    }

    fn text(&self) -> String {
        self.state.borrow().text.clone()
    }

    fn set_markup(&self, markup: bool) {
        self.state.borrow_mut().markup = markup;
    }

    fn set_justify(&self, justify: Justification) {
        self.state.borrow_mut().justify = Some(justify);
    }

    fn set_wrap(&self, wrap: bool) {
        self.state.borrow_mut().wrap = wrap;
    }

    fn set_xalign(&self, xalign: f64) {
        self.state.borrow_mut().xalign = Some(xalign);
    }

    fn set_yalign(&self, yalign: f64) {
        self.state.borrow_mut().yalign = Some(yalign);
    }

    fn set_range(&self, min: f64, max: f64) {
        let changed = {
            let mut state = self.state.borrow_mut();
            state.min = min;
            state.max = max;
            let clamped = if min <= max {
                state.value.clamp(min, max)
            } else {
                state.value
            };
            if (clamped - state.value).abs() > f64::EPSILON {
                state.value = clamped;
                true
            } else {
                false
            }
        };
        if changed {
            let value = self.value();
            self.emit(Signal::ValueChanged, Some(SignalValue::Float(value)));
        }
    }

    fn set_value(&self, value: f64) {
        let changed = {
            let mut state = self.state.borrow_mut();
            let clamped = if state.min <= state.max {
                value.clamp(state.min, state.max)
            } else {
                value
            };
            if (clamped - state.value).abs() > f64::EPSILON {
                state.value = clamped;
                true
            } else {
                false
            }
        };
        if changed {
            let value = self.value();
            self.emit(Signal::ValueChanged, Some(SignalValue::Float(value)));
        }
    }

    fn value(&self) -> f64 {
        self.state.borrow().value
    }

    fn set_draw_value(&self, draw: bool) {
        self.state.borrow_mut().draw_value = draw;
    }

    fn set_placeholder(&self, text: &str) {
        self.state.borrow_mut().placeholder = text.to_string();
    }

    fn set_input_visibility(&self, visible: bool) {
        self.state.borrow_mut().input_visible = visible;
    }

    fn set_scroll_policy(
        &self,
        horizontal: Option<ScrollPolicy>,
        vertical: Option<ScrollPolicy>,
    ) {
        let mut state = self.state.borrow_mut();
        if horizontal.is_some() {
            state.hscroll = horizontal;
        }
        if vertical.is_some() {
            state.vscroll = vertical;
        }
    }

    fn set_transition(&self, transition: Transition) {
        self.state.borrow_mut().transition = Some(transition);
    }

    fn set_transition_duration_ms(&self, duration_ms: u32) {
        self.state.borrow_mut().transition_duration_ms = duration_ms;
    }

    fn set_reveal_child(&self, reveal: bool) {
        self.state.borrow_mut().reveal_child = reveal;
    }

    fn set_fraction(&self, fraction: f64) {
        self.state.borrow_mut().fraction = fraction.clamp(0.0, 1.0);
    }

    fn set_active(&self, active: bool) {
        let changed = {
            let mut state = self.state.borrow_mut();
            if state.active == active {
                false
            } else {
                state.active = active;
                true
            }
        };
        if changed {
            self.emit(Signal::SwitchToggled, Some(SignalValue::Bool(active)));
        }
    }

    fn is_active(&self) -> bool {
        self.state.borrow().active
    }

    fn set_icon_name(&self, name: &str) {
        self.state.borrow_mut().icon_name = name.to_string();
    }

    fn set_pixel_size(&self, size: i32) {
        self.state.borrow_mut().pixel_size = Some(size);
    }

    fn connect(&self, signal: Signal, handler: SignalHandler) -> SignalHandle {
        let id = self.next_handler.get();
        self.next_handler.set(id + 1);
        self.handlers.borrow_mut().push((signal, id, handler));
        SignalHandle(id)
    }

    fn emit(&self, signal: Signal, value: Option<SignalValue>) {
        let widget: WidgetRef = match self.self_weak.upgrade() {
            Some(widget) => widget,
            None => return,
        };
        // Snapshot so handlers may connect or mutate without a live borrow.
        let handlers: Vec<SignalHandler> = self
            .handlers
            .borrow()
            .iter()
            .filter(|(s, _, _)| *s == signal)
            .map(|(_, _, handler)| handler.clone())
            .collect();
        for handler in handlers {
            handler(&widget, value.as_ref());
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Downcast helper for inspection in tests and tree walkers.
pub fn headless(widget: &WidgetRef) -> &HeadlessWidget {
    widget
        .as_any()
        .downcast_ref::<HeadlessWidget>()
        .expect("widget was not created by the headless toolkit")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_value_clamps_and_emits_once_per_actual_change() {
        let toolkit = HeadlessToolkit::new();
        let slider = toolkit.create_slider();
        slider.set_range(0.0, 1.0);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        slider.connect(
            Signal::ValueChanged,
            Rc::new(move |_, value| {
                if let Some(SignalValue::Float(v)) = value {
                    sink.borrow_mut().push(*v);
                }
            }),
        );

        slider.set_value(0.4);
        slider.set_value(0.4);
        slider.set_value(2.0);

        assert_eq!(seen.borrow().as_slice(), &[0.4, 1.0]);
    }

    #[test]
    fn handlers_fire_in_connection_order() {
        let toolkit = HeadlessToolkit::new();
        let button = toolkit.create_button();

        let order = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let sink = order.clone();
            button.connect(
                Signal::Clicked,
                Rc::new(move |_, _| sink.borrow_mut().push(tag)),
            );
        }

        button.emit(Signal::Clicked, None);
        assert_eq!(order.borrow().as_slice(), &["first", "second", "third"]);
    }

    #[test]
    fn stack_ignores_unknown_page_names() {
        let toolkit = HeadlessToolkit::new();
        let stack = toolkit.create_stack();
        let page = toolkit.create_label();
        stack.add_named(&page, "a");

        stack.set_visible_child_name("missing");
        assert_eq!(stack.visible_child_name().as_deref(), Some("a"));
    }
}
