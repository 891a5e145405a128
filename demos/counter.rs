//! Counter Demo - output ports driving reactive bindings
//!
//! A button's `click` port, renamed to `increment`, feeds a counter
//! signal; a label follows the counter. Clicks are simulated with
//! `dispatch_event`.
//!
//! Run with: cargo run --example counter

use spark_dom::elements::{button, div, span};
use spark_dom::{mount, Child, NativeEvent, Node, Properties, PropValue};
use spark_signals::signal;

fn main() {
    println!("=== spark-dom Counter Demo ===\n");

    let count = signal(0i32);
    let label = signal("Clicked 0 times".to_string());

    let app = div().with_children(
        Properties::new().class("counter"),
        vec![
            Child::from(button().with_children(
                Properties::new()
                    .attr("type", "button")
                    .output("click", "increment")
                    .class_toggle("hot", PropValue::getter({
                        let count = count.clone();
                        move || count.get() >= 3
                    })),
                "+1",
            )),
            Child::from(span().children(label.clone())),
        ],
    );

    let root = Node::element("body");
    let handle = mount(&app, &root);

    let increments = handle
        .output()
        .children()
        .and_then(|children| children.stream("increment"))
        .expect("button exposes increment");
    let _unsubscribe = increments.subscribe({
        let count = count.clone();
        let label = label.clone();
        move |_| {
            let next = count.get() + 1;
            count.set(next);
            label.set(format!("Clicked {next} times"));
        }
    });

    let button_node = handle.nodes()[0].children()[0].clone();
    for _ in 0..3 {
        button_node.dispatch_event(NativeEvent::new("click"));
        println!(
            "  text: {:?}  classes: {:?}",
            root.text_content(),
            button_node.classes()
        );
    }

    handle.unmount();
    println!("\nUnmounted, root has {} children", root.child_count());
}
