use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use workforce_core::{DomainError, DomainResult, EmployeeId, normalize_email};

/// Organisational unit an employee belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "IT")]
    It,
    #[serde(rename = "HR")]
    Hr,
    Finance,
    Marketing,
    Operations,
}

impl Department {
    pub const ALL: [Department; 5] = [
        Department::It,
        Department::Hr,
        Department::Finance,
        Department::Marketing,
        Department::Operations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::It => "IT",
            Department::Hr => "HR",
            Department::Finance => "Finance",
            Department::Marketing => "Marketing",
            Department::Operations => "Operations",
        }
    }
}

impl core::str::FromStr for Department {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Department::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown department `{s}`")))
    }
}

impl core::fmt::Display for Department {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmployeeType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Contract,
    Intern,
}

impl EmployeeType {
    pub const ALL: [EmployeeType; 4] = [
        EmployeeType::FullTime,
        EmployeeType::PartTime,
        EmployeeType::Contract,
        EmployeeType::Intern,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeType::FullTime => "Full-time",
            EmployeeType::PartTime => "Part-time",
            EmployeeType::Contract => "Contract",
            EmployeeType::Intern => "Intern",
        }
    }
}

impl core::str::FromStr for EmployeeType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        EmployeeType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown employee type `{s}`")))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmploymentStatus {
    #[default]
    Active,
    Inactive,
}

impl core::str::FromStr for EmploymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "active" => Ok(EmploymentStatus::Active),
            "inactive" => Ok(EmploymentStatus::Inactive),
            other => Err(DomainError::validation(format!("unknown status `{other}`"))),
        }
    }
}

/// Postal address. Every part is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
}

impl Address {
    /// Trim every part and drop blanks; `None` if nothing is left.
    fn normalized(self) -> Option<Address> {
        let address = Address {
            street: optional_text(self.street),
            city: optional_text(self.city),
            state: optional_text(self.state),
            zip_code: optional_text(self.zip_code),
        };
        (address != Address::default()).then_some(address)
    }
}

/// A stored employee record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    pub department: Department,
    pub position: String,
    pub employee_type: EmployeeType,
    pub salary: f64,
    pub hire_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    pub status: EmploymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    pub fn create(id: EmployeeId, new: NewEmployee, now: DateTime<Utc>) -> Self {
        Self {
            id,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            phone: new.phone,
            address: new.address,
            department: new.department,
            position: new.position,
            employee_type: new.employee_type,
            salary: new.salary,
            hire_date: new.hire_date,
            profile_picture: new.profile_picture,
            status: new.status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the fields present in `update` and bump `updated_at`.
    pub fn apply(&mut self, update: EmployeeUpdate, now: DateTime<Utc>) {
        let EmployeeUpdate {
            first_name,
            last_name,
            email,
            phone,
            address,
            department,
            position,
            employee_type,
            salary,
            hire_date,
            profile_picture,
            status,
        } = update;

        if let Some(v) = first_name {
            self.first_name = v;
        }
        if let Some(v) = last_name {
            self.last_name = v;
        }
        if let Some(v) = email {
            self.email = v;
        }
        if let Some(v) = phone {
            self.phone = v;
        }
        if let Some(v) = address {
            self.address = v;
        }
        if let Some(v) = department {
            self.department = v;
        }
        if let Some(v) = position {
            self.position = v;
        }
        if let Some(v) = employee_type {
            self.employee_type = v;
        }
        if let Some(v) = salary {
            self.salary = v;
        }
        if let Some(v) = hire_date {
            self.hire_date = v;
        }
        if let Some(v) = profile_picture {
            self.profile_picture = v;
        }
        if let Some(v) = status {
            self.status = v;
        }
        self.updated_at = now;
    }

}

/// Salary as submitted: a JSON number or a numeric string (form posts send strings).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SalaryInput {
    Number(f64),
    Text(String),
}

/// Raw, unvalidated employee fields as they arrive at the boundary.
///
/// Used for both create (required fields enforced) and update (only present
/// fields validated).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeDraft {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<Address>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub employee_type: Option<String>,
    pub salary: Option<SalaryInput>,
    pub hire_date: Option<String>,
    pub profile_picture: Option<String>,
    pub status: Option<String>,
}

/// Validated input for a new employee.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<Address>,
    pub department: Department,
    pub position: String,
    pub employee_type: EmployeeType,
    pub salary: f64,
    pub hire_date: NaiveDate,
    pub profile_picture: Option<String>,
    pub status: EmploymentStatus,
}

impl NewEmployee {
    pub fn from_draft(draft: EmployeeDraft) -> DomainResult<Self> {
        Ok(Self {
            first_name: required_text("firstName", draft.first_name)?,
            last_name: required_text("lastName", draft.last_name)?,
            email: normalize_email(&required_text("email", draft.email)?)?,
            phone: required_text("phone", draft.phone)?,
            address: draft.address.and_then(Address::normalized),
            department: required_text("department", draft.department)?.parse()?,
            position: required_text("position", draft.position)?,
            employee_type: required_text("employeeType", draft.employee_type)?.parse()?,
            salary: parse_salary(draft.salary.ok_or_else(|| missing("salary"))?)?,
            hire_date: parse_hire_date(&required_text("hireDate", draft.hire_date)?)?,
            profile_picture: optional_text(draft.profile_picture),
            status: match optional_text(draft.status) {
                Some(s) => s.parse()?,
                None => EmploymentStatus::default(),
            },
        })
    }
}

/// Validated partial update. `None` leaves the stored value untouched.
///
/// For the optional fields (`address`, `profile_picture`) the inner `None`
/// clears the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<Option<Address>>,
    pub department: Option<Department>,
    pub position: Option<String>,
    pub employee_type: Option<EmployeeType>,
    pub salary: Option<f64>,
    pub hire_date: Option<NaiveDate>,
    pub profile_picture: Option<Option<String>>,
    pub status: Option<EmploymentStatus>,
}

impl EmployeeUpdate {
    pub fn from_draft(draft: EmployeeDraft) -> DomainResult<Self> {
        let present = |field: &'static str, value: Option<String>| -> DomainResult<Option<String>> {
            value.map(|v| required_text(field, Some(v))).transpose()
        };

        Ok(Self {
            first_name: present("firstName", draft.first_name)?,
            last_name: present("lastName", draft.last_name)?,
            email: present("email", draft.email)?
                .map(|e| normalize_email(&e))
                .transpose()?,
            phone: present("phone", draft.phone)?,
            address: draft.address.map(Address::normalized),
            department: present("department", draft.department)?
                .map(|d| d.parse())
                .transpose()?,
            position: present("position", draft.position)?,
            employee_type: present("employeeType", draft.employee_type)?
                .map(|t| t.parse())
                .transpose()?,
            salary: draft.salary.map(parse_salary).transpose()?,
            hire_date: present("hireDate", draft.hire_date)?
                .map(|d| parse_hire_date(&d))
                .transpose()?,
            profile_picture: draft.profile_picture.map(|p| optional_text(Some(p))),
            status: present("status", draft.status)?
                .map(|s| s.parse())
                .transpose()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == EmployeeUpdate::default()
    }
}

fn missing(field: &str) -> DomainError {
    DomainError::validation(format!("{field} is required"))
}

fn required_text(field: &str, value: Option<String>) -> DomainResult<String> {
    optional_text(value).ok_or_else(|| missing(field))
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_salary(input: SalaryInput) -> DomainResult<f64> {
    let salary = match input {
        SalaryInput::Number(n) => n,
        SalaryInput::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| DomainError::validation("salary must be a number"))?,
    };
    if !salary.is_finite() || salary < 0.0 {
        return Err(DomainError::validation("salary must be a non-negative number"));
    }
    Ok(salary)
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (date part kept).
fn parse_hire_date(raw: &str) -> DomainResult<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| DomainError::validation("hireDate must be a date (YYYY-MM-DD)"))
}
