// Output formatting helpers for CLI commands

use roster_service::{SessionView, UserRecord};

/// Print a status message: "     Loading message"
pub fn status(action: &str, message: &str) {
    eprintln!("\x1b[1;36m{:>12}\x1b[0m {}", action, message);
}

/// Print a success message with checkmark
pub fn success(message: &str) {
    eprintln!("\x1b[1;32m  \u{2713}\x1b[0m {}", message);
}

/// Print a failure message with X
pub fn failure(message: &str) {
    eprintln!("\x1b[1;31m  \u{2717}\x1b[0m {}", message);
}

/// Print an info message
pub fn info(message: &str) {
    eprintln!("\x1b[36m  i\x1b[0m {}", message);
}

/// Print a dim/muted message
pub fn dim(message: &str) {
    eprintln!("\x1b[2m{}\x1b[0m", message);
}

pub fn user_row(user: &UserRecord) -> String {
    format!(
        "{:>6}  {:<24} {:<32} {}",
        user.id, user.name, user.email, user.phone
    )
}

/// Print the visible page as a table followed by the page position
pub fn user_table(view: &SessionView) {
    if view.users.is_empty() {
        dim("  No users found.");
        return;
    }

    println!(
        "\x1b[1m{:>6}  {:<24} {:<32} {}\x1b[0m",
        "ID", "Name", "Email", "Phone"
    );
    for user in &view.users {
        println!("{}", user_row(user));
    }

    let mut footer = format!(
        "  Page {}/{} ({} user(s)",
        view.current_page, view.total_pages, view.filtered_count
    );
    if !view.query.is_empty() {
        footer.push_str(&format!(" matching '{}'", view.query));
    }
    footer.push(')');
    dim(&footer);
}
