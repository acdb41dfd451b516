//! Retained-mode toolkit collaborator surface.
//!
//! The composition layer never touches a real rendering toolkit. It consumes
//! the traits below (one constructor per widget kind, container operations,
//! property setters, signal connection) and produces live widget handles.
//! Rendering, layout, and the native event loop belong to the backend.

use std::{any::Any, fmt, rc::Rc};

use shared::domain::{Justification, Orientation, ScrollPolicy, Transition};

pub mod headless;

pub type WidgetRef = Rc<dyn Widget>;

/// Handler invoked with the emitting widget and the signal payload.
pub type SignalHandler = Rc<dyn Fn(&WidgetRef, Option<&SignalValue>)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Box,
    CenterBox,
    Label,
    Button,
    Slider,
    Stack,
    Entry,
    Scrollable,
    Revealer,
    Overlay,
    ProgressBar,
    Switch,
    Icon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Clicked,
    ValueChanged,
    Pressed,
    Released,
    Scrolled,
    Activated,
    TextChanged,
    SwitchToggled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SignalValue {
    Float(f64),
    Text(String),
    Bool(bool),
    Scroll(ScrollDirection),
}

impl fmt::Display for SignalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Scroll(ScrollDirection::Up) => f.write_str("up"),
            Self::Scroll(ScrollDirection::Down) => f.write_str("down"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Start,
    Center,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalHandle(pub u64);

/// One live toolkit widget. The parent that appended or set a child owns its
/// lifetime; handles are reference-counted views.
pub trait Widget {
    fn kind(&self) -> WidgetKind;

    // Container operations.
    fn append(&self, child: &WidgetRef);
    fn set_child(&self, child: &WidgetRef);
    fn set_slot(&self, slot: Slot, child: &WidgetRef);
    fn add_named(&self, child: &WidgetRef, name: &str);
    fn set_visible_child_name(&self, name: &str);
    fn visible_child_name(&self) -> Option<String>;
    fn add_overlay(&self, child: &WidgetRef);
    fn set_overlay_passthrough(&self, child: &WidgetRef, passthrough: bool);

    // Property setters and readbacks.
    fn set_orientation(&self, orientation: Orientation);
    fn orientation(&self) -> Orientation;
    fn set_spacing(&self, spacing: i32);
    fn set_homogeneous(&self, homogeneous: bool);
    fn set_text(&self, text: &str);
    fn text(&self) -> String;
    fn set_markup(&self, markup: bool);
    fn set_justify(&self, justify: Justification);
    fn set_wrap(&self, wrap: bool);
    fn set_xalign(&self, xalign: f64);
    fn set_yalign(&self, yalign: f64);
    fn set_range(&self, min: f64, max: f64);
    /// Backends emit `Signal::ValueChanged` when the stored value actually
    /// changes, whether the change came from the user or from code.
    fn set_value(&self, value: f64);
    fn value(&self) -> f64;
    fn set_draw_value(&self, draw: bool);
    fn set_placeholder(&self, text: &str);
    fn set_input_visibility(&self, visible: bool);
    /// `None` for an axis leaves that axis at the backend default.
    fn set_scroll_policy(&self, horizontal: Option<ScrollPolicy>, vertical: Option<ScrollPolicy>);
    fn set_transition(&self, transition: Transition);
    fn set_transition_duration_ms(&self, duration_ms: u32);
    fn set_reveal_child(&self, reveal: bool);
    fn set_fraction(&self, fraction: f64);
    fn set_active(&self, active: bool);
    fn is_active(&self) -> bool;
    fn set_icon_name(&self, name: &str);
    fn set_pixel_size(&self, size: i32);

    // Signals. Delivery is synchronous and in connection order.
    fn connect(&self, signal: Signal, handler: SignalHandler) -> SignalHandle;
    fn emit(&self, signal: Signal, value: Option<SignalValue>);

    fn as_any(&self) -> &dyn Any;
}

/// Constructor-per-widget-kind backend factory.
pub trait Toolkit {
    fn create_box(&self) -> WidgetRef;
    fn create_center_box(&self) -> WidgetRef;
    fn create_label(&self) -> WidgetRef;
    fn create_button(&self) -> WidgetRef;
    fn create_slider(&self) -> WidgetRef;
    fn create_stack(&self) -> WidgetRef;
    fn create_entry(&self) -> WidgetRef;
    fn create_scrollable(&self) -> WidgetRef;
    fn create_revealer(&self) -> WidgetRef;
    fn create_overlay(&self) -> WidgetRef;
    fn create_progress_bar(&self) -> WidgetRef;
    fn create_switch(&self) -> WidgetRef;
    fn create_icon(&self) -> WidgetRef;
}
