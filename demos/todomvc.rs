//! Scripted TodoMVC session driving the store through the app layer
//!
//! Run with `RUST_LOG=todostore=debug` to see every mutation.

use todostore::{AppView, InitialState, TodoApp, TodoSeed, TodoStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_view(view: &AppView) {
    println!("   --- {} ---", view.filter);
    if view.show_main {
        let mark = if view.toggle_all_checked { "x" } else { " " };
        println!("   [{mark}] Mark all as complete");
        for row in &view.rows {
            let status = if row.completed { "✓" } else { " " };
            let editing = if row.editing { "  (editing)" } else { "" };
            println!("   [{status}] {}{editing}", row.label);
        }
    }
    if view.show_footer {
        let clear = if view.show_clear_completed {
            " | Clear completed"
        } else {
            ""
        };
        println!("   {}{clear}", view.items_left());
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,todostore=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    println!("=== TodoMVC ===\n");

    println!("1. Seeding the store");
    let store = TodoStore::create(InitialState::new(vec![
        TodoSeed::completed("Taste JavaScript"),
        TodoSeed::active("Buy a unicorn"),
    ]));
    let app = TodoApp::new(store);

    // Re-renders after every change the view depends on
    let _render = app.render(print_view);

    let _subscription = app.store().subscribe(|store| {
        println!(
            "   [Store Update] Total: {}, Active: {}, Completed: {}",
            store.len(),
            store.active_todos_count(),
            store.completed_todos_count()
        );
    });

    println!("\n2. Typing a new todo with stray whitespace");
    app.type_new_todo("  Create a TODO for testing  ");
    app.submit_new_todo();

    println!("\n3. Submitting a blank todo (ignored)");
    app.type_new_todo("    ");
    if app.submit_new_todo().is_none() {
        println!("   nothing added");
    }

    println!("\n4. Editing the unicorn");
    let unicorn = app.store().active_todos()[0].id();
    app.begin_edit(unicorn);
    app.type_edit("Buy two unicorns");
    app.commit_edit();

    println!("\n5. Showing active todos");
    app.navigate("/active");

    println!("\n6. Marking everything complete");
    app.toggle_all();

    println!("\n7. Back to all, then clearing completed");
    app.navigate("/");
    app.clear_completed();

    app.debug_dump();
    println!("\n✓ TodoMVC session complete!");
}
