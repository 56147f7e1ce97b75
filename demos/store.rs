//! Demonstration of the reactive primitives underneath the todo store

use todostore::{batch, Effect, Memo, Signal, Store, TodoStore};

#[derive(Clone, Debug)]
struct Settings {
    theme: String,
    page_size: usize,
}

fn main() {
    println!("=== Store Example: Primitives ===\n");

    // A generic store with a whole-state subscriber
    println!("1. Generic store with a subscriber");
    let settings = Store::new(Settings {
        theme: "light".to_string(),
        page_size: 20,
    });
    let _settings_subscription = settings.subscribe(|state| {
        println!(
            "   [Settings] theme: {}, page size: {}",
            state.theme, state.page_size
        );
    });
    settings.update(|state| state.theme = "dark".to_string());

    // Signals, memos and an effect reading through both
    println!("\n2. Signals and memos");
    let items = Signal::new(vec![3, 1, 4, 1, 5]);
    let total = Memo::new({
        let items = items.clone();
        move || items.with(|items| items.iter().sum::<i32>())
    });
    let largest = items.map(|items| items.iter().copied().max().unwrap_or(0));

    let _effect = Effect::new({
        let (total, largest) = (total.clone(), largest.clone());
        move || println!("   [Effect] total: {}, largest: {}", total.get(), largest.get())
    });

    println!("\n3. Two writes in one batch run the effect once");
    batch(|| {
        items.update(|items| items.push(9));
        items.update(|items| items.retain(|n| *n != 1));
    });

    // The todo store is built from the same pieces
    println!("\n4. Observing a todo store");
    let todos = TodoStore::new();
    let _observer = todos.observe(|store| {
        println!(
            "   [Todos] {} active of {}",
            store.active_todos_count(),
            store.len()
        );
    });

    let first = todos.add_todo("Learn Rust");
    todos.add_todo("Build reactive library");
    todos.toggle(first, None);

    println!("\n5. Editing marker changes do not touch the counter observer");
    todos.edit_todo(first);
    todos.stop_editing();

    println!("\n✓ Example complete!");
}
