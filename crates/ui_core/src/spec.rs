//! Widget configuration records.
//!
//! Specs are statically typed: a wrong value kind or an unrecognized key is
//! rejected at parse time (`deny_unknown_fields`), never silently ignored.
//! Enumerated style options stay strings here; the factory resolves them
//! leniently (warn + safe default) at build time.

use std::{fmt, rc::Rc};

use serde::Deserialize;
use serde_json::Value;
use shared::error::ConfigError;
use toolkit::{Toolkit, WidgetRef};

use crate::action::Action;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WidgetSpec {
    Box(BoxSpec),
    CenterBox(CenterBoxSpec),
    Label(LabelSpec),
    Button(ButtonSpec),
    Slider(SliderSpec),
    Stack(StackSpec),
    Entry(EntrySpec),
    Scrollable(ScrollableSpec),
    Revealer(RevealerSpec),
    Overlay(OverlaySpec),
    ProgressBar(ProgressBarSpec),
    Switch(SwitchSpec),
    Icon(IconSpec),
    /// Late-bound widget: the kind is itself a zero-argument constructor.
    /// Programmatic only; configuration files cannot express it.
    #[serde(skip)]
    Custom(CustomSpec),
}

impl WidgetSpec {
    pub fn custom(constructor: impl Fn(&dyn Toolkit) -> WidgetRef + 'static) -> Self {
        Self::Custom(CustomSpec::new(constructor))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoxSpec {
    pub orientation: String,
    pub spacing: i32,
    pub homogeneous: bool,
    pub children: Vec<WidgetSpec>,
}

impl Default for BoxSpec {
    fn default() -> Self {
        Self {
            orientation: "horizontal".to_string(),
            spacing: 0,
            homogeneous: false,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CenterBoxSpec {
    pub orientation: Option<String>,
    pub start: Option<Box<WidgetSpec>>,
    pub center: Option<Box<WidgetSpec>>,
    pub end: Option<Box<WidgetSpec>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabelSpec {
    pub text: String,
    pub markup: bool,
    pub justify: Option<String>,
    pub wrap: bool,
    pub xalign: Option<f64>,
    pub yalign: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ButtonSpec {
    pub child: Option<Box<WidgetSpec>>,
    pub on_click: Action,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SliderSpec {
    pub min: f64,
    pub max: f64,
    pub value: f64,
    pub draw_value: bool,
    pub on_change: Action,
}

impl Default for SliderSpec {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 1.0,
            value: 0.0,
            draw_value: false,
            on_change: Action::None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StackSpec {
    pub items: Vec<StackItem>,
}

/// One named page. Pages are added in declaration order.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StackItem {
    pub name: String,
    pub child: WidgetSpec,
}

impl<S: Into<String>> From<(S, WidgetSpec)> for StackItem {
    fn from((name, child): (S, WidgetSpec)) -> Self {
        Self {
            name: name.into(),
            child,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EntrySpec {
    pub text: String,
    pub placeholder: Option<String>,
    /// Input visibility; false masks typed characters.
    pub visibility: bool,
    pub on_accept: Action,
    pub on_change: Action,
}

impl Default for EntrySpec {
    fn default() -> Self {
        Self {
            text: String::new(),
            placeholder: None,
            visibility: true,
            on_accept: Action::None,
            on_change: Action::None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollableSpec {
    pub child: Option<Box<WidgetSpec>>,
    pub hscroll: Option<String>,
    pub vscroll: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealerSpec {
    pub child: Option<Box<WidgetSpec>>,
    pub transition: Option<String>,
    pub transition_duration_ms: u32,
    pub reveal_child: bool,
}

impl Default for RevealerSpec {
    fn default() -> Self {
        Self {
            child: None,
            transition: None,
            transition_duration_ms: 250,
            reveal_child: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlaySpec {
    /// First child is the base; the rest are stacked as overlays.
    pub children: Vec<WidgetSpec>,
    pub passthrough: bool,
}

impl Default for OverlaySpec {
    fn default() -> Self {
        Self {
            children: Vec::new(),
            passthrough: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProgressBarSpec {
    pub fraction: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwitchSpec {
    pub active: bool,
    pub on_activate: Action,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IconSpec {
    pub icon: String,
    pub size: Option<i32>,
}

#[derive(Clone)]
pub struct CustomSpec {
    pub constructor: Rc<dyn Fn(&dyn Toolkit) -> WidgetRef>,
}

impl CustomSpec {
    pub fn new(constructor: impl Fn(&dyn Toolkit) -> WidgetRef + 'static) -> Self {
        Self {
            constructor: Rc::new(constructor),
        }
    }
}

impl fmt::Debug for CustomSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomSpec(..)")
    }
}

/// Parses a JSON configuration value into a spec. Fails fast: missing
/// `type`, an unknown kind, an unrecognized key, or a wrong value kind all
/// abort construction of that widget.
pub fn from_value(value: Value) -> Result<WidgetSpec, ConfigError> {
    if !value.is_object() {
        return Err(ConfigError::invalid("widget spec must be an object"));
    }
    if value.get("type").is_none() {
        return Err(ConfigError::MissingKind);
    }
    serde_json::from_value(value).map_err(classify)
}

pub fn from_json(json: &str) -> Result<WidgetSpec, ConfigError> {
    let value: Value =
        serde_json::from_str(json).map_err(|error| ConfigError::invalid(error.to_string()))?;
    from_value(value)
}

fn classify(error: serde_json::Error) -> ConfigError {
    let detail = error.to_string();
    if let Some(rest) = detail.strip_prefix("unknown variant `") {
        if let Some(kind) = rest.split('`').next() {
            return ConfigError::UnknownKind {
                kind: kind.to_string(),
            };
        }
    }
    if detail.starts_with("missing field `type`") {
        return ConfigError::MissingKind;
    }
    ConfigError::Invalid { detail }
}

#[cfg(test)]
#[path = "tests/spec_tests.rs"]
mod tests;
