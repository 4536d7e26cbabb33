//! Sample component graph shared by the integration tests
#![allow(dead_code)]

use chartwork::component_identity;
use chartwork::config::{
    Adapter, ClassRegistry, Component, ConfigNode, Dictionary, DictionaryTemplate,
    EventDispatcher, List, ListTemplate, Slot,
};
use chartwork::types::Value;

/// Route `tracing` output through the test harness. Set `RUST_LOG=chartwork=debug`
/// (with `--features tracing`) to see what the processor skips.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Clone, Debug)]
pub struct Chart {
    pub language: ConfigNode,
    pub width: Value,
    pub padding: Value,
    pub background: Value,
    pub title: Option<Box<dyn Component>>,
    pub legend: Option<Box<dyn Component>>,
    pub series: ListTemplate,
    pub axes: DictionaryTemplate,
    pub colors: List,
    pub meta: Dictionary,
    pub adapter: Adapter,
    pub events: EventDispatcher,
    /// Keys in the order the processor asked for them
    pub visited: Vec<String>,
}

impl Default for Chart {
    fn default() -> Self {
        Self {
            language: ConfigNode::Null,
            width: Value::Null,
            padding: Value::empty_object(),
            background: Value::Null,
            title: None,
            legend: Some(Box::new(Legend::default())),
            series: ListTemplate::new(LineSeries::default()),
            axes: DictionaryTemplate::new(Axis::default()),
            colors: List::new(),
            meta: Dictionary::new(),
            adapter: Adapter::new(),
            events: EventDispatcher::new(),
            visited: Vec::new(),
        }
    }
}

impl Component for Chart {
    component_identity!("Chart");

    fn slot(&mut self, key: &str) -> Option<Slot<'_>> {
        self.visited.push(key.to_string());
        Some(match key {
            "language" => Slot::Raw(&mut self.language),
            "width" => Slot::Value(&mut self.width),
            "padding" => Slot::Value(&mut self.padding),
            "background" => Slot::Typed(&mut self.background),
            "title" => Slot::Component(&mut self.title),
            "legend" => Slot::Component(&mut self.legend),
            "series" => Slot::ListTemplate(&mut self.series),
            "axes" => Slot::DictionaryTemplate(&mut self.axes),
            "colors" => Slot::List(&mut self.colors),
            "meta" => Slot::Dictionary(&mut self.meta),
            "adapter" => Slot::Adapter(&mut self.adapter),
            "events" => Slot::Events(&mut self.events),
            _ => return None,
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct Label {
    pub text: Value,
    pub fill: Value,
}

impl Component for Label {
    component_identity!("Label");

    fn slot(&mut self, key: &str) -> Option<Slot<'_>> {
        match key {
            "text" => Some(Slot::Value(&mut self.text)),
            "fill" => Some(Slot::Typed(&mut self.fill)),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Legend {
    pub position: Value,
    pub labels: Option<Box<dyn Component>>,
}

impl Component for Legend {
    component_identity!("Legend");

    fn slot(&mut self, key: &str) -> Option<Slot<'_>> {
        match key {
            "position" => Some(Slot::Value(&mut self.position)),
            "labels" => Some(Slot::Component(&mut self.labels)),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct LineSeries {
    pub name: Value,
    pub stroke: Value,
    pub tension: Value,
}

impl Component for LineSeries {
    component_identity!("LineSeries");

    fn slot(&mut self, key: &str) -> Option<Slot<'_>> {
        match key {
            "name" => Some(Slot::Value(&mut self.name)),
            "stroke" => Some(Slot::Typed(&mut self.stroke)),
            "tension" => Some(Slot::Value(&mut self.tension)),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ColumnSeries {
    pub name: Value,
    pub width: Value,
}

impl Component for ColumnSeries {
    component_identity!("ColumnSeries");

    fn slot(&mut self, key: &str) -> Option<Slot<'_>> {
        match key {
            "name" => Some(Slot::Value(&mut self.name)),
            "width" => Some(Slot::Value(&mut self.width)),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Axis {
    pub min: Value,
    pub max: Value,
    pub title: Option<Box<dyn Component>>,
}

impl Component for Axis {
    component_identity!("Axis");

    fn slot(&mut self, key: &str) -> Option<Slot<'_>> {
        match key {
            "min" => Some(Slot::Value(&mut self.min)),
            "max" => Some(Slot::Value(&mut self.max)),
            "title" => Some(Slot::Component(&mut self.title)),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct DateAxis {
    pub base_interval: Value,
}

impl Component for DateAxis {
    component_identity!("DateAxis");

    fn slot(&mut self, key: &str) -> Option<Slot<'_>> {
        match key {
            "baseInterval" => Some(Slot::Value(&mut self.base_interval)),
            _ => None,
        }
    }
}

pub fn registry() -> ClassRegistry {
    ClassRegistry::builder()
        .register_default::<Chart>()
        .register_default::<Label>()
        .register_default::<Legend>()
        .register_default::<LineSeries>()
        .register_default::<ColumnSeries>()
        .register_default::<Axis>()
        .register_default::<DateAxis>()
        .build()
}

pub fn json(text: &str) -> ConfigNode {
    ConfigNode::from_json_str(text).expect("test config is valid JSON")
}
