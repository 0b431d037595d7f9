//! Page Example - components, hooks and context rendered to HTML
//!
//! This example demonstrates:
//! - Function, closure and class components
//! - State settled by an effect before the page is returned
//! - A theme published through a context provider
//! - Conditional class maps and raw markup
//!
//! Run with: RUST_LOG=spark_html=trace cargo run --example page

use spark_html::*;
use tracing_subscriber::EnvFilter;

// =============================================================================
// Components
// =============================================================================

/// Header reading the theme from context.
fn header(props: &Props, hooks: &mut Hooks<'_>) -> Result<Value> {
    let theme = hooks.use_context("theme")?;
    let title = props.get("title").cloned().unwrap_or_default();

    let classes = Props::from([
        ("header", Value::Bool(true)),
        ("header-dark", Value::Bool(theme.as_str() == Some("dark"))),
    ]);

    Ok(el("header")
        .prop("class", classes)
        .child(el("h1").child(title))
        .into())
}

/// Visit counter whose final value is set by an effect.
fn counter(_: &Props, hooks: &mut Hooks<'_>) -> Result<Value> {
    let (visits, set_visits) = hooks.use_state(0i64)?;
    hooks.use_effect(ONCE, move || set_visits.set(42))?;

    let label = hooks.use_memo(Some(visits), move || format!("{visits} visits"))?;
    Ok(el("p").prop("class", "counter").child(label).into())
}

/// Footer rendered as a class component.
#[derive(Default)]
struct Footer;

impl Render for Footer {
    fn render(&self, props: &Props, _: &mut Hooks<'_>) -> Result<Value> {
        Ok(el("footer")
            .child(unsafe_html("&copy; 2026"))
            .child(" ")
            .child(props.children())
            .into())
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let items = ["Reconciler", "Hooks", "Context"];
    let list = Component::from_closure(move |_: &Props, _: &mut Hooks<'_>| {
        Ok(el("ul")
            .children(items.iter().map(|item| el("li").child(*item)))
            .into())
    });

    let page = provider().prop("theme", "dark").child(
        el("main")
            .prop("id", "page")
            .child(el(Component::from_fn(header)).prop("title", "spark-html <demo>"))
            .child(el(Component::from_fn(counter)))
            .child(el(list))
            .child(el("img").prop("src", "/logo.png").prop("alt", "logo"))
            .child(el(Component::class::<Footer>()).child("All rights reserved")),
    );

    let renderer = Renderer::with_config(RenderConfig::new().rerender_limit(Some(100)));
    let tree = renderer.render(page)?;
    println!("=== spark-html Page Example ===\n");
    println!("Nodes in tree: {}", tree.len());
    println!();
    HtmlSerializer::new().write_to(&tree, &mut std::io::stdout().lock())?;
    println!();

    Ok(())
}
