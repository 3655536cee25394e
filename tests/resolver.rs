use std::borrow::Cow;

use ftl_runtime::resolver::ResolverError;
use ftl_runtime::types::{FluentDateTime, FluentDateTimeOptions};
use ftl_runtime::{FluentArgs, FluentBundle, FluentError, FluentResource, FluentValue};
use unic_langid::langid;

fn bundle_from(source: &str) -> FluentBundle<FluentResource> {
    let resource = FluentResource::try_new(source).expect("Failed to parse an FTL string.");
    let mut bundle = FluentBundle::new(vec![langid!("en-US")]);
    bundle
        .add_resource(resource)
        .expect("Failed to add FTL resources to the bundle.");
    bundle
}

fn format_with(
    bundle: &FluentBundle<FluentResource>,
    id: &str,
    args: Option<&FluentArgs>,
    errors: &mut Vec<FluentError>,
) -> String {
    let msg = bundle.get_message(id).expect("Message doesn't exist.");
    let pattern = msg.value().expect("Message has no value.");
    bundle.format_pattern(pattern, args, errors).into_owned()
}

#[test]
fn interpolation_with_isolation() {
    let bundle = bundle_from("welcome = Hello, {$name}!");
    let mut args = FluentArgs::new();
    args.set("name", "Anna");

    let mut errors = vec![];
    let value = format_with(&bundle, "welcome", Some(&args), &mut errors);
    assert_eq!(value, "Hello, \u{2068}Anna\u{2069}!");
    assert!(errors.is_empty(), "Resolver errors: {:#?}", errors);
}

#[test]
fn interpolation_without_isolation() {
    let mut bundle = bundle_from("welcome = Hello, {$name}!");
    bundle.set_use_isolating(false);
    let mut args = FluentArgs::new();
    args.set("name", "Anna");

    let mut errors = vec![];
    let value = format_with(&bundle, "welcome", Some(&args), &mut errors);
    assert_eq!(value, "Hello, Anna!");
    assert!(errors.is_empty(), "Resolver errors: {:#?}", errors);
}

#[test]
fn single_element_pattern_is_not_isolated() {
    let bundle = bundle_from("only = {$name}");
    let mut args = FluentArgs::new();
    args.set("name", "Anna");

    let mut errors = vec![];
    let value = format_with(&bundle, "only", Some(&args), &mut errors);
    assert_eq!(value, "Anna");
}

#[test]
fn term_reference() {
    let bundle = bundle_from("-brand = Foo 3000\nhi = Welcome to {-brand}!");
    let mut errors = vec![];
    let value = format_with(&bundle, "hi", None, &mut errors);
    assert_eq!(value, "Welcome to \u{2068}Foo 3000\u{2069}!");
    assert!(errors.is_empty(), "Resolver errors: {:#?}", errors);
}

#[test]
fn plural_select() {
    let source = "
msgs = {$n ->
    [one] You have one message
   *[other] You have {$n} messages
}
";
    let bundle = bundle_from(source);

    let mut args = FluentArgs::new();
    args.set("n", 1);
    let mut errors = vec![];
    let value = format_with(&bundle, "msgs", Some(&args), &mut errors);
    assert_eq!(value, "You have one message");

    let mut args = FluentArgs::new();
    args.set("n", 5);
    let mut errors = vec![];
    let value = format_with(&bundle, "msgs", Some(&args), &mut errors);
    assert_eq!(value, "You have \u{2068}5\u{2069} messages");
}

#[test]
fn exact_number_key_wins_over_plural_category() {
    let source = "
msgs = {$n ->
    [1] Exactly one
    [one] Category one
   *[other] Other
}
";
    let bundle = bundle_from(source);
    let mut args = FluentArgs::new();
    args.set("n", 1);
    let mut errors = vec![];
    let value = format_with(&bundle, "msgs", Some(&args), &mut errors);
    assert_eq!(value, "Exactly one");
}

#[test]
fn number_keys_match_by_value_not_options() {
    let source = "
msgs = {NUMBER($n, minimumFractionDigits: 2) ->
    [1] one thing
   *[other] other things
}
";
    let bundle = bundle_from(source);
    let mut args = FluentArgs::new();
    args.set("n", 1);
    let mut errors = vec![];
    let value = format_with(&bundle, "msgs", Some(&args), &mut errors);
    assert_eq!(value, "one thing");
    assert!(errors.is_empty(), "Resolver errors: {:#?}", errors);
}

#[test]
fn string_selector_matches_variant_key() {
    let source = "
mood = {$tone ->
    [happy] Yay
   *[neutral] Ok
}
";
    let bundle = bundle_from(source);
    let mut args = FluentArgs::new();
    args.set("tone", "happy");
    let mut errors = vec![];
    let value = format_with(&bundle, "mood", Some(&args), &mut errors);
    assert_eq!(value, "Yay");
}

#[test]
fn missing_selector_falls_back_to_default() {
    let source = "
mood = {$tone ->
    [happy] Yay
   *[neutral] Ok
}
";
    let bundle = bundle_from(source);
    let mut errors = vec![];
    let value = format_with(&bundle, "mood", None, &mut errors);
    assert_eq!(value, "Ok");
    assert_eq!(
        errors,
        vec![FluentError::ResolverError(ResolverError::UnknownVariable(
            "tone".into()
        ))]
    );
}

#[test]
fn unknown_variable_is_reported_and_visible() {
    let bundle = bundle_from("hi = Hello, {$name}!");
    let mut errors = vec![];
    let value = format_with(&bundle, "hi", None, &mut errors);
    assert_eq!(value, "Hello, \u{2068}{name}\u{2069}!");
    assert_eq!(
        errors,
        vec![FluentError::ResolverError(ResolverError::UnknownVariable(
            "name".into()
        ))]
    );
}

#[test]
fn unknown_message_reference() {
    let bundle = bundle_from("m = A {missing} B");
    let mut errors = vec![];
    let value = format_with(&bundle, "m", None, &mut errors);
    assert_eq!(value, "A \u{2068}{missing}\u{2069} B");
    assert_eq!(
        errors,
        vec![FluentError::ResolverError(ResolverError::UnknownMessage(
            "missing".into()
        ))]
    );
}

#[test]
fn unknown_term_reference() {
    let bundle = bundle_from("m = {-nope}");
    let mut errors = vec![];
    let value = format_with(&bundle, "m", None, &mut errors);
    assert_eq!(value, "{-nope}");
    assert_eq!(
        errors,
        vec![FluentError::ResolverError(ResolverError::UnknownTerm(
            "nope".into()
        ))]
    );
}

#[test]
fn unknown_attribute_reference() {
    let bundle = bundle_from("has-attr = Value\n    .title = T\nm = {has-attr.nope}");
    let mut errors = vec![];
    let value = format_with(&bundle, "m", None, &mut errors);
    assert_eq!(value, "{has-attr.nope}");
    assert_eq!(
        errors,
        vec![FluentError::ResolverError(
            ResolverError::UnknownAttribute("has-attr.nope".into())
        )]
    );
}

#[test]
fn message_attribute_reference() {
    let bundle = bundle_from("has-attr = Value\n    .title = The title\nm = {has-attr.title}");
    let mut errors = vec![];
    let value = format_with(&bundle, "m", None, &mut errors);
    assert_eq!(value, "The title");
    assert!(errors.is_empty(), "Resolver errors: {:#?}", errors);
}

#[test]
fn message_without_value_reports_no_value() {
    let bundle = bundle_from("only-attr =\n    .title = T\nm = A {only-attr} B");
    let mut errors = vec![];
    let value = format_with(&bundle, "m", None, &mut errors);
    assert_eq!(value, "A \u{2068}{only-attr}\u{2069} B");
    assert_eq!(
        errors,
        vec![FluentError::ResolverError(ResolverError::NoValue(
            "only-attr".into()
        ))]
    );
}

#[test]
fn unknown_function_call() {
    let bundle = bundle_from("m = {MISSING(1)}");
    let mut errors = vec![];
    let value = format_with(&bundle, "m", None, &mut errors);
    assert_eq!(value, "{MISSING()}");
    assert_eq!(
        errors,
        vec![FluentError::ResolverError(ResolverError::UnknownFunction(
            "MISSING".into()
        ))]
    );
}

#[test]
fn cyclic_reference_is_reported_once() {
    let bundle = bundle_from("a = {b}\nb = {a}");
    let mut errors = vec![];
    let value = format_with(&bundle, "a", None, &mut errors);
    assert_eq!(value, "{a}");
    assert_eq!(
        errors,
        vec![FluentError::ResolverError(ResolverError::Cyclic)]
    );
}

#[test]
fn self_reference_is_cyclic() {
    let bundle = bundle_from("me = {me}");
    let mut errors = vec![];
    let value = format_with(&bundle, "me", None, &mut errors);
    assert_eq!(value, "{me}");
    assert_eq!(
        errors,
        vec![FluentError::ResolverError(ResolverError::Cyclic)]
    );
}

#[test]
fn repeated_references_are_not_a_cycle() {
    // The cycle guard only covers patterns currently on the stack;
    // referencing the same message twice in a row is fine.
    let bundle = bundle_from("leaf = X\na = {leaf}{leaf}");
    let mut errors = vec![];
    let value = format_with(&bundle, "a", None, &mut errors);
    assert_eq!(value, "\u{2068}X\u{2069}\u{2068}X\u{2069}");
    assert!(errors.is_empty(), "Resolver errors: {:#?}", errors);
}

#[test]
fn placeable_expansion_overflow_is_fatal() {
    let source = "
a = {b}{b}
b = {c}{c}
c = {d}{d}
d = {e}{e}
e = {f}{f}
f = {g}{g}
g = {h}{h}
h = X
";
    let bundle = bundle_from(source);
    let mut errors = vec![];
    let value = format_with(&bundle, "a", None, &mut errors);
    // Partial output is discarded; the None rendering is all that remains.
    assert_eq!(value, "{???}");
    assert_eq!(
        errors,
        vec![FluentError::ResolverError(
            ResolverError::TooManyPlaceables
        )]
    );
}

#[test]
fn parameterized_term() {
    let source = "
-thing = {$kind ->
   *[default] thing
    [cat] cat
}
own = I have a {-thing(kind: \"cat\")}.
";
    let bundle = bundle_from(source);
    let mut errors = vec![];
    let value = format_with(&bundle, "own", None, &mut errors);
    assert_eq!(value, "I have a \u{2068}cat\u{2069}.");
    assert!(errors.is_empty(), "Resolver errors: {:#?}", errors);
}

#[test]
fn term_without_arguments_uses_its_default() {
    let source = "
-thing = {$kind ->
   *[default] thing
    [cat] cat
}
own = I have a {-thing}.
";
    let bundle = bundle_from(source);
    let mut errors = vec![];
    let value = format_with(&bundle, "own", None, &mut errors);
    assert_eq!(value, "I have a \u{2068}thing\u{2069}.");
    assert!(errors.is_empty(), "Resolver errors: {:#?}", errors);
}

#[test]
fn missing_variable_in_term_frame_is_silent() {
    let source = "-t = {$missing}\nuse-t = {-t}";
    let bundle = bundle_from(source);
    let mut errors = vec![];
    let value = format_with(&bundle, "use-t", None, &mut errors);
    assert_eq!(value, "{missing}");
    assert!(errors.is_empty(), "Resolver errors: {:#?}", errors);
}

#[test]
fn caller_arguments_are_not_visible_to_terms() {
    let source = "-t = {$arg}\nuse-t = {-t}";
    let bundle = bundle_from(source);
    let mut args = FluentArgs::new();
    args.set("arg", "visible?");
    let mut errors = vec![];
    let value = format_with(&bundle, "use-t", Some(&args), &mut errors);
    assert_eq!(value, "{arg}");
    assert!(errors.is_empty(), "Resolver errors: {:#?}", errors);
}

#[test]
fn number_literal_precision_drives_rendering() {
    let bundle = bundle_from("pad = {1.50}\nplain = {3.14}");
    let mut errors = vec![];
    assert_eq!(format_with(&bundle, "pad", None, &mut errors), "1.50");
    assert_eq!(format_with(&bundle, "plain", None, &mut errors), "3.14");
    assert!(errors.is_empty(), "Resolver errors: {:#?}", errors);
}

#[test]
fn number_builtin_merges_options() {
    let bundle = bundle_from("price = {NUMBER($v, minimumFractionDigits: 2)}");
    let mut args = FluentArgs::new();
    args.set("v", 3);
    let mut errors = vec![];
    let value = format_with(&bundle, "price", Some(&args), &mut errors);
    assert_eq!(value, "3.00");
    assert!(errors.is_empty(), "Resolver errors: {:#?}", errors);
}

#[test]
fn number_builtin_parses_strings() {
    let bundle = bundle_from("n = {NUMBER(\"2.5\")}");
    let mut errors = vec![];
    let value = format_with(&bundle, "n", None, &mut errors);
    assert_eq!(value, "2.5");
}

#[test]
fn number_builtin_propagates_none() {
    let bundle = bundle_from("n = {NUMBER($missing)}");
    let mut errors = vec![];
    let value = format_with(&bundle, "n", None, &mut errors);
    assert_eq!(value, "{NUMBER(missing)}");
    assert_eq!(
        errors,
        vec![FluentError::ResolverError(ResolverError::UnknownVariable(
            "missing".into()
        ))]
    );
}

#[test]
fn datetime_builtin_formats_a_timestamp() {
    let bundle =
        bundle_from("when = {DATETIME($d, dateStyle: \"medium\", timeStyle: \"short\")}");
    let mut args = FluentArgs::new();
    // 2011-10-05T14:48:00.000Z
    args.set(
        "d",
        FluentValue::DateTime(FluentDateTime::new(
            1317826080000.0,
            FluentDateTimeOptions::default(),
        )),
    );
    let mut errors = vec![];
    let value = format_with(&bundle, "when", Some(&args), &mut errors);
    assert_eq!(value, "2011-10-05 14:48");
    assert!(errors.is_empty(), "Resolver errors: {:#?}", errors);
}

#[test]
fn datetime_builtin_accepts_epoch_numbers() {
    let bundle = bundle_from("when = {DATETIME($d)}");
    let mut args = FluentArgs::new();
    args.set("d", 1317826080000.0_f64);
    let mut errors = vec![];
    let value = format_with(&bundle, "when", Some(&args), &mut errors);
    assert_eq!(value, "2011-10-05");
}

#[test]
fn custom_function_takes_precedence_over_builtins() {
    let mut bundle = bundle_from("platform = {PLATFORM()}");
    bundle
        .add_function("PLATFORM", |_positional, _named| "linux".into())
        .expect("Failed to add a function to the bundle.");
    let mut errors = vec![];
    let value = format_with(&bundle, "platform", None, &mut errors);
    assert_eq!(value, "linux");
}

#[test]
fn custom_function_receives_named_arguments() {
    let mut bundle = bundle_from("m = {AXIS(1, 2, unit: \"px\")}");
    bundle
        .add_function("AXIS", |positional, named| {
            let unit = match named.get("unit") {
                Some(FluentValue::String(s)) => s.to_string(),
                _ => String::new(),
            };
            format!("{}{}", positional.len(), unit).into()
        })
        .expect("Failed to add a function to the bundle.");
    let mut errors = vec![];
    let value = format_with(&bundle, "m", None, &mut errors);
    assert_eq!(value, "2px");
}

#[test]
fn transform_applies_to_text_elements() {
    fn transform(s: &str) -> Cow<str> {
        s.replace('a', "@").into()
    }

    let mut bundle = bundle_from("simple = many a letter\ncomplex = an {$x} here");
    bundle.set_use_isolating(false);
    bundle.set_transform(Some(transform));

    let mut errors = vec![];
    assert_eq!(
        format_with(&bundle, "simple", None, &mut errors),
        "m@ny @ letter"
    );

    let mut args = FluentArgs::new();
    args.set("x", "appleseed");
    assert_eq!(
        format_with(&bundle, "complex", Some(&args), &mut errors),
        "@n appleseed here"
    );
}

#[test]
fn formatter_overrides_value_rendering() {
    fn formatter(
        value: &FluentValue,
        _intls: &intl_memoizer::IntlLangMemoizer,
    ) -> Option<String> {
        match value {
            FluentValue::Number(n) => Some(format!("#{}", n.value)),
            _ => None,
        }
    }

    let mut bundle = bundle_from("m = {$n}");
    bundle.set_use_isolating(false);
    bundle.set_formatter(Some(formatter));

    let mut args = FluentArgs::new();
    args.set("n", 4);
    let mut errors = vec![];
    let value = format_with(&bundle, "m", Some(&args), &mut errors);
    assert_eq!(value, "#4");
}

#[test]
fn write_pattern_streams_into_a_sink() {
    let bundle = bundle_from("hello-world = Hello World!");
    let msg = bundle
        .get_message("hello-world")
        .expect("Message doesn't exist.");
    let pattern = msg.value().expect("Message has no value.");

    let mut s = String::new();
    let mut errors = vec![];
    bundle
        .write_pattern(&mut s, pattern, None, &mut errors)
        .expect("Failed to write.");
    assert_eq!(s, "Hello World!");
}

#[test]
fn selector_resolves_through_a_message_reference() {
    let source = "
tone = happy
mood = {tone ->
    [happy] Yay
   *[neutral] Ok
}
";
    let bundle = bundle_from(source);
    let mut errors = vec![];
    let value = format_with(&bundle, "mood", None, &mut errors);
    assert_eq!(value, "Yay");
    assert!(errors.is_empty(), "Resolver errors: {:#?}", errors);
}
