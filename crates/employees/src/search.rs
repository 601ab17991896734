//! Free-text employee search.

use crate::Employee;

/// Case-insensitive substring match over first name, last name, email,
/// department and position.
///
/// The query is treated as literal text. A blank query matches every record.
pub fn matches_query(employee: &Employee, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    [
        employee.first_name.as_str(),
        employee.last_name.as_str(),
        employee.email.as_str(),
        employee.department.as_str(),
        employee.position.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}
