use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Print one item per line, or `empty` when there are none.
pub fn print_list<S: AsRef<str>>(items: &[S], empty: &str) {
    if items.is_empty() {
        println!("{empty}");
        return;
    }
    for item in items {
        println!("{}", item.as_ref());
    }
}
