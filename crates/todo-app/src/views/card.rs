use todo_model::Task;

/// One task as a block of text, headed by its 1-based card number.
pub fn render_card(number: usize, task: &Task) -> String {
    let mut out = format!("#{number} {}\n", task.title);
    if !task.description.is_empty() {
        out.push_str(&format!("   {}\n", task.description));
    }
    out.push_str(&format!(
        "   Status: {} | Priority: {} | Deadline: {}",
        task.status.label(),
        task.priority.label(),
        deadline(task)
    ));
    if let Some(id) = &task.id {
        out.push_str(&format!(" | ID: {id}"));
    }
    out.push('\n');
    out
}

/// Calendar date of the deadline; timestamps are cut at the time part.
fn deadline(task: &Task) -> &str {
    match task.deadline_str() {
        "" => "None",
        d => d.split('T').next().unwrap_or(d),
    }
}
