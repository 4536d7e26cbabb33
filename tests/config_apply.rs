mod common;

use chartwork::config::{ConfigNode, ConfigProcessor, Entry, ProcessorOptions};
use chartwork::configure;
use chartwork::errors::ConfigError;
use chartwork::types::{Color, Percent, Value};
use common::*;
use miette::Diagnostic;

fn series_names(chart: &Chart) -> Vec<(String, Value)> {
    chart
        .series
        .iter()
        .map(|item| {
            let name = match item.downcast_ref::<LineSeries>() {
                Some(series) => series.name.clone(),
                None => item.downcast_ref::<ColumnSeries>().unwrap().name.clone(),
            };
            (item.class_name().to_string(), name)
        })
        .collect()
}

#[test]
fn typed_nodes_match_the_registered_factory() {
    init_tracing();
    let registry = registry();
    let processor = ConfigProcessor::new(&registry);

    for name in registry.names() {
        let mut chart = Chart::default();
        let config = ConfigNode::object([(
            "title",
            ConfigNode::object([("type", ConfigNode::from(name))]),
        )]);
        processor.apply(&mut chart, config).unwrap();

        let expected = registry.create(name).unwrap();
        let title = chart.title.as_deref().unwrap();
        assert_eq!(title.class_name(), expected.class_name());
    }
}

#[test]
fn unregistered_type_fails_the_apply() {
    let registry = registry();
    let processor = ConfigProcessor::new(&registry);
    let mut chart = Chart::default();

    let err = processor
        .apply(&mut chart, json(r#"{"title": {"type": "Gauge", "text": "x"}}"#))
        .unwrap_err();
    assert!(matches!(err, ConfigError::UnknownType { ref type_name } if type_name == "Gauge"));
    assert!(chart.title.is_none());
}

#[test]
fn unknown_type_is_reported_even_for_value_slots() {
    let registry = registry();
    let processor = ConfigProcessor::new(&registry);
    let mut chart = Chart::default();

    let err = processor
        .apply(&mut chart, json(r#"{"padding": {"type": "Nope", "top": 1}}"#))
        .unwrap_err();
    assert!(matches!(err, ConfigError::UnknownType { .. }));
}

#[test]
fn configure_wraps_errors_and_keeps_earlier_changes() {
    init_tracing();
    let registry = registry();
    let mut chart = Chart::default();

    let err = configure(
        &registry,
        &mut chart,
        json(r##"{"width": 640, "title": {"type": "Gauge"}, "background": "#fff"}"##),
    )
    .unwrap_err();

    assert_eq!(err.class_name, "Chart");
    assert!(matches!(err.source, ConfigError::UnknownType { .. }));
    assert_eq!(
        err.code().map(|code| code.to_string()).as_deref(),
        Some("chartwork::config::critical")
    );
    // No rollback, and nothing after the failing key
    assert_eq!(chart.width, Value::Number(640.0));
    assert_eq!(chart.background, Value::Null);
}

#[test]
fn language_is_applied_first_and_reserved_keys_never() {
    let registry = registry();
    let processor = ConfigProcessor::new(&registry);
    let mut chart = Chart::default();

    processor
        .apply(
            &mut chart,
            json(r#"{"type": "Chart", "width": 1, "forceCreate": true, "language": {"locale": "de_DE"}}"#),
        )
        .unwrap();

    assert_eq!(chart.visited, ["language", "width"]);
    // Raw slots keep the node untouched
    let locale = chart.language.as_object().and_then(|map| map.get("locale"));
    assert!(matches!(locale, Some(ConfigNode::String(s)) if s == "de_DE"));
}

#[test]
fn first_key_can_be_changed() {
    let registry = registry();
    let options = ProcessorOptions::default().with_first_key("background");
    let processor = ConfigProcessor::with_options(&registry, options);
    let mut chart = Chart::default();

    processor
        .apply(&mut chart, json(r##"{"language": "en", "width": 1, "background": "#000"}"##))
        .unwrap();
    assert_eq!(chart.visited, ["background", "language", "width"]);
}

#[test]
fn unknown_keys_are_skipped() {
    let registry = registry();
    let processor = ConfigProcessor::new(&registry);
    let mut chart = Chart::default();

    processor
        .apply(&mut chart, json(r#"{"doesNotExist": {"type": "Gauge"}, "width": 3}"#))
        .unwrap();
    assert_eq!(chart.width, Value::Number(3.0));
}

#[test]
fn non_object_config_is_ignored() {
    let registry = registry();
    let processor = ConfigProcessor::new(&registry);
    let mut chart = Chart::default();

    processor.apply(&mut chart, json("[1, 2, 3]")).unwrap();
    processor.apply(&mut chart, ConfigNode::Null).unwrap();
    assert!(chart.visited.is_empty());
}

#[test]
fn string_coercion() {
    let registry = registry();
    let processor = ConfigProcessor::new(&registry);
    let mut chart = Chart::default();

    processor
        .apply(&mut chart, json(r##"{"background": "#FFF", "width": "80%"}"##))
        .unwrap();
    assert_eq!(chart.background, Value::Color(Color::rgb(255, 255, 255)));
    assert_eq!(chart.width, Value::Percent(Percent(80.0)));

    processor
        .apply(&mut chart, json(r#"{"width": "wide"}"#))
        .unwrap();
    assert_eq!(chart.width, Value::String("wide".into()));
}

#[test]
fn object_values_merge_shallowly() {
    let registry = registry();
    let processor = ConfigProcessor::new(&registry);
    let mut chart = Chart::default();

    processor
        .apply(&mut chart, json(r#"{"padding": {"top": 5, "left": 1}}"#))
        .unwrap();
    processor
        .apply(&mut chart, json(r#"{"padding": {"left": 3}}"#))
        .unwrap();
    assert_eq!(chart.padding.get("top"), Some(&Value::Number(5.0)));
    assert_eq!(chart.padding.get("left"), Some(&Value::Number(3.0)));

    // Anything that is not object onto object replaces
    processor
        .apply(&mut chart, json(r#"{"padding": 4}"#))
        .unwrap();
    assert_eq!(chart.padding, Value::Number(4.0));
}

#[test]
fn existing_child_is_merged_in_place() {
    let registry = registry();
    let processor = ConfigProcessor::new(&registry);
    let mut chart = Chart::default();

    processor
        .apply(&mut chart, json(r#"{"legend": {"position": "bottom"}}"#))
        .unwrap();
    // Same type: the instance is reused
    processor
        .apply(
            &mut chart,
            json(r#"{"legend": {"type": "Legend", "labels": {"type": "Label", "text": "Series"}}}"#),
        )
        .unwrap();

    let legend = chart.legend.as_deref().unwrap().downcast_ref::<Legend>().unwrap();
    assert_eq!(legend.position, Value::String("bottom".into()));
    let labels = legend.labels.as_deref().unwrap().downcast_ref::<Label>().unwrap();
    assert_eq!(labels.text, Value::String("Series".into()));

    // forceCreate starts over
    processor
        .apply(&mut chart, json(r#"{"legend": {"type": "Legend", "forceCreate": true}}"#))
        .unwrap();
    let legend = chart.legend.as_deref().unwrap().downcast_ref::<Legend>().unwrap();
    assert_eq!(legend.position, Value::Null);
}

#[test]
fn untyped_object_for_empty_child_is_ignored() {
    let registry = registry();
    let processor = ConfigProcessor::new(&registry);
    let mut chart = Chart::default();

    processor
        .apply(&mut chart, json(r#"{"title": {"text": "Revenue"}}"#))
        .unwrap();
    assert!(chart.title.is_none());
}

#[test]
fn prebuilt_instances_are_assigned() {
    let registry = registry();
    let processor = ConfigProcessor::new(&registry);
    let mut chart = Chart::default();

    let label = Label {
        text: Value::from("Prebuilt"),
        fill: Value::Null,
    };
    processor
        .apply(&mut chart, ConfigNode::object([("title", ConfigNode::instance(label))]))
        .unwrap();

    let title = chart.title.as_deref().unwrap().downcast_ref::<Label>().unwrap();
    assert_eq!(title.text, Value::from("Prebuilt"));
}

#[test]
fn list_template_reuses_then_creates() {
    init_tracing();
    let registry = registry();
    let processor = ConfigProcessor::new(&registry);
    let mut chart = Chart::default();

    // m = 1 existing entry with state the config does not touch
    let existing = chart.series.create();
    existing.downcast_mut::<LineSeries>().unwrap().stroke = Value::Color(Color::rgb(1, 2, 3));

    let config = r#"{"series": [
        {"name": "Revenue"},
        {"type": "ColumnSeries", "name": "Units"},
        {"name": "Margin"}
    ]}"#;
    processor.apply(&mut chart, json(config)).unwrap();

    assert_eq!(chart.series.len(), 3);
    assert_eq!(
        series_names(&chart),
        [
            ("LineSeries".to_string(), Value::from("Revenue")),
            ("ColumnSeries".to_string(), Value::from("Units")),
            ("LineSeries".to_string(), Value::from("Margin")),
        ]
    );
    let first = chart.series.get(0).unwrap().downcast_ref::<LineSeries>().unwrap();
    assert_eq!(first.stroke, Value::Color(Color::rgb(1, 2, 3)));

    // Applying again creates nothing
    let before = series_names(&chart);
    processor.apply(&mut chart, json(config)).unwrap();
    assert_eq!(chart.series.len(), 3);
    assert_eq!(series_names(&chart), before);
}

#[test]
fn list_template_object_configures_the_template() {
    let registry = registry();
    let processor = ConfigProcessor::new(&registry);
    let mut chart = Chart::default();

    processor
        .apply(&mut chart, json(r##"{"series": {"stroke": "#00f", "tension": 0.8}}"##))
        .unwrap();
    assert!(chart.series.is_empty());

    processor
        .apply(&mut chart, json(r#"{"series": [{"name": "A"}]}"#))
        .unwrap();
    let series = chart.series.get(0).unwrap().downcast_ref::<LineSeries>().unwrap();
    assert_eq!(series.stroke, Value::Color(Color::rgb(0, 0, 255)));
    assert_eq!(series.tension, Value::Number(0.8));
    assert_eq!(series.name, Value::from("A"));
}

#[test]
fn list_template_force_create_appends() {
    let registry = registry();
    let processor = ConfigProcessor::new(&registry);
    let mut chart = Chart::default();

    processor
        .apply(&mut chart, json(r#"{"series": [{"name": "A"}]}"#))
        .unwrap();
    processor
        .apply(&mut chart, json(r#"{"series": [{"name": "B", "forceCreate": true}]}"#))
        .unwrap();
    assert_eq!(chart.series.len(), 2);
    assert_eq!(series_names(&chart)[0].1, Value::from("A"));
    assert_eq!(series_names(&chart)[1].1, Value::from("B"));
}

#[test]
fn reused_list_entries_still_reject_unknown_types() {
    let registry = registry();
    let processor = ConfigProcessor::new(&registry);
    let mut chart = Chart::default();
    chart.series.create();

    let err = processor
        .apply(&mut chart, json(r#"{"series": [{"type": "Gauge", "name": "A"}]}"#))
        .unwrap_err();
    assert!(matches!(err, ConfigError::UnknownType { ref type_name } if type_name == "Gauge"));
    assert_eq!(series_names(&chart)[0].1, Value::Null);

    chart.colors.push(Value::empty_object());
    let err = processor
        .apply(&mut chart, json(r#"{"colors": [{"type": "Gauge"}]}"#))
        .unwrap_err();
    assert!(matches!(err, ConfigError::UnknownType { .. }));
}

#[test]
fn plain_list_entries() {
    let registry = registry();
    let processor = ConfigProcessor::new(&registry);
    let mut chart = Chart::default();

    // A scalar is a one-element list
    processor
        .apply(&mut chart, json(r##"{"colors": "#f00"}"##))
        .unwrap();
    assert_eq!(chart.colors.values().collect::<Vec<_>>(), [&Value::Color(Color::rgb(255, 0, 0))]);

    processor
        .apply(
            &mut chart,
            json(r##"{"colors": ["#0f0", {"a": 1}, "25%", {"type": "Label", "text": "x"}]}"##),
        )
        .unwrap();
    assert_eq!(chart.colors.len(), 4);
    assert_eq!(
        chart.colors.get(0).and_then(Entry::as_value),
        Some(&Value::Color(Color::rgb(0, 255, 0)))
    );
    assert_eq!(
        chart.colors.get(2).and_then(Entry::as_value),
        Some(&Value::Percent(Percent(25.0)))
    );
    let label = chart.colors.get(3).and_then(Entry::as_component).unwrap();
    assert_eq!(label.downcast_ref::<Label>().unwrap().text, Value::from("x"));

    // Objects merge into the existing entry
    processor
        .apply(&mut chart, json(r##"{"colors": ["#0f0", {"b": 2}]}"##))
        .unwrap();
    assert_eq!(chart.colors.len(), 4);
    let object = chart.colors.get(1).and_then(Entry::as_value).unwrap();
    assert_eq!(object.get("a"), Some(&Value::Number(1.0)));
    assert_eq!(object.get("b"), Some(&Value::Number(2.0)));
}

#[test]
fn dictionary_template_entries() {
    let registry = registry();
    let processor = ConfigProcessor::new(&registry);
    let mut chart = Chart::default();

    processor
        .apply(
            &mut chart,
            json(r#"{"axes": {"x": {"min": 0}, "y": {"type": "DateAxis", "baseInterval": "day"}}}"#),
        )
        .unwrap();
    processor
        .apply(&mut chart, json(r#"{"axes": {"x": {"max": 10}, "y": {"type": "DateAxis"}}}"#))
        .unwrap();

    assert_eq!(chart.axes.len(), 2);
    assert_eq!(chart.axes.keys().collect::<Vec<_>>(), ["x", "y"]);
    let x = chart.axes.get("x").unwrap().downcast_ref::<Axis>().unwrap();
    assert_eq!(x.min, Value::Number(0.0));
    assert_eq!(x.max, Value::Number(10.0));
    let y = chart.axes.get("y").unwrap().downcast_ref::<DateAxis>().unwrap();
    assert_eq!(y.base_interval, Value::from("day"));
}

#[test]
fn plain_dictionary_is_left_alone() {
    let registry = registry();
    let processor = ConfigProcessor::new(&registry);
    let mut chart = Chart::default();

    processor
        .apply(&mut chart, json(r#"{"meta": {"source": "erp"}, "width": 2}"#))
        .unwrap();
    assert!(chart.meta.is_empty());
    assert_eq!(chart.width, Value::Number(2.0));
}

#[test]
fn adapters_and_events_register_handlers() {
    let registry = registry();
    let processor = ConfigProcessor::new(&registry);
    let mut chart = Chart::default();

    let config = ConfigNode::object([
        (
            "adapter",
            ConfigNode::object([(
                "label",
                ConfigNode::callback(|value| match value {
                    Value::String(s) => Value::String(s.to_uppercase()),
                    other => other,
                }),
            )]),
        ),
        (
            "events",
            ConfigNode::object([
                ("hit", ConfigNode::callback(|value| value)),
                ("over", ConfigNode::callback(|value| value)),
            ]),
        ),
    ]);
    processor.apply(&mut chart, config).unwrap();

    assert_eq!(chart.adapter.apply("label", Value::from("q1")), Value::from("Q1"));
    assert_eq!(chart.adapter.apply("other", Value::from("q1")), Value::from("q1"));
    assert!(chart.events.has_listeners("hit"));
    assert_eq!(chart.events.dispatch("over", &Value::Null), 1);
    assert_eq!(chart.events.dispatch("out", &Value::Null), 0);
}

#[test]
fn raw_slots_take_typed_nodes_as_is() {
    let registry = registry();
    let processor = ConfigProcessor::new(&registry);
    let mut chart = Chart::default();

    processor
        .apply(
            &mut chart,
            json(r#"{"language": {"type": "Locale", "code": "de"}, "width": 2}"#),
        )
        .unwrap();

    let language = chart.language.as_object().unwrap();
    assert!(matches!(language.get("type"), Some(ConfigNode::String(s)) if s == "Locale"));
    assert!(matches!(language.get("code"), Some(ConfigNode::String(s)) if s == "de"));
    assert_eq!(chart.width, Value::Number(2.0));
}

#[test]
fn handler_maps_are_not_type_checked() {
    let registry = registry();
    let processor = ConfigProcessor::new(&registry);
    let mut chart = Chart::default();

    let handlers = || {
        ConfigNode::object([
            ("type", ConfigNode::from("Listener")),
            ("hit", ConfigNode::callback(|value| value)),
        ])
    };
    let config = ConfigNode::object([("adapter", handlers()), ("events", handlers())]);
    processor.apply(&mut chart, config).unwrap();

    assert!(chart.adapter.has("hit"));
    assert!(chart.events.has_listeners("hit"));
}
