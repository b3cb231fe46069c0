//! Natural-language list rendering: "a, b, and c" / "a, b, or c".

/// Join with "and", using a serial comma for three or more items.
pub fn and_list<S: AsRef<str>>(items: &[S]) -> String {
    join_with(items, "and")
}

/// Join with "or", using a serial comma for three or more items.
pub fn or_list<S: AsRef<str>>(items: &[S]) -> String {
    join_with(items, "or")
}

fn join_with<S: AsRef<str>>(items: &[S], conjunction: &str) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_owned(),
        [first, second] => format!("{} {} {}", first.as_ref(), conjunction, second.as_ref()),
        [head @ .., last] => {
            let head: Vec<&str> = head.iter().map(AsRef::as_ref).collect();
            format!("{}, {} {}", head.join(", "), conjunction, last.as_ref())
        }
    }
}
