//! Bare-bones HTML for each view. Layout and styling are out of scope; these
//! pages only need to carry the forms, records and messages.

use crate::flows::{Level, Message, View};
use crate::forms::EmployeeInput;
use empdesk_protocol::EmployeeRecord;
use std::fmt::Write;

pub fn render(view: &View, messages: &[Message]) -> String {
    let (title, body) = match view {
        View::SignIn { username } => ("Sign in", sign_in(username)),
        View::SignUp { username, email } => ("Sign up", sign_up(username, email)),
        View::EmployeeList { employees } => ("Employees", employee_list(employees)),
        View::CreateEmployee { form } => ("New employee", employee_form("/create/", form)),
        View::UpdateEmployee { id, form } => {
            ("Edit employee", employee_form(&format!("/update/{}/", id), form))
        }
        View::DeleteEmployee { id, employee } => {
            ("Delete employee", delete_confirmation(*id, employee))
        }
    };

    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{title}</title></head><body>\n<h1>{title}</h1>\n",
    );
    if !messages.is_empty() {
        html.push_str("<ul class=\"messages\">\n");
        for message in messages {
            let _ = writeln!(
                html,
                "<li class=\"{}\">{}</li>",
                level_class(message.level),
                escape(&message.text)
            );
        }
        html.push_str("</ul>\n");
    }
    html.push_str(&body);
    html.push_str("</body></html>\n");
    html
}

fn level_class(level: Level) -> &'static str {
    match level {
        Level::Success => "success",
        Level::Warning => "warning",
        Level::Error => "error",
    }
}

fn sign_in(username: &str) -> String {
    format!(
        "<form method=\"post\" action=\"/signin/\">\n{}{}<button type=\"submit\">Sign in</button>\n</form>\n<p><a href=\"/signup/\">Create an account</a></p>\n",
        input("text", "username", username),
        input("password", "password", ""),
    )
}

fn sign_up(username: &str, email: &str) -> String {
    format!(
        "<form method=\"post\" action=\"/signup/\">\n{}{}{}{}<button type=\"submit\">Sign up</button>\n</form>\n<p><a href=\"/signin/\">Sign in</a></p>\n",
        input("text", "username", username),
        input("email", "email", email),
        input("password", "password", ""),
        input("password", "confirm_password", ""),
    )
}

fn employee_list(employees: &[EmployeeRecord]) -> String {
    let mut html = String::from(
        "<p><a href=\"/create/\">Add employee</a></p>\n<form method=\"post\" action=\"/signout/\"><button type=\"submit\">Sign out</button></form>\n",
    );

    if employees.is_empty() {
        html.push_str("<p>No employees found.</p>\n");
        return html;
    }

    html.push_str("<table>\n<tr><th>ID</th><th>Name</th><th>Email</th><th>Contact</th><th></th></tr>\n");
    for employee in employees {
        let actions = match employee.id {
            Some(id) => format!(
                "<a href=\"/update/{id}/\">Edit</a> <a href=\"/delete/{id}/\">Delete</a>"
            ),
            None => String::new(),
        };
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&employee.employee_id),
            escape(&employee.employee_name),
            escape(&employee.employee_email),
            escape(&employee.employee_contact),
            actions
        );
    }
    html.push_str("</table>\n");
    html
}

fn employee_form(action: &str, form: &EmployeeInput) -> String {
    format!(
        "<form method=\"post\" action=\"{}\">\n{}{}{}{}<button type=\"submit\">Save</button>\n</form>\n<p><a href=\"/list/\">Back to list</a></p>\n",
        escape(action),
        input("text", "employee_id", &form.employee_id),
        input("text", "employee_name", &form.employee_name),
        input("email", "employee_email", &form.employee_email),
        input("text", "employee_contact", &form.employee_contact),
    )
}

fn delete_confirmation(id: u64, employee: &EmployeeRecord) -> String {
    format!(
        "<p>Delete {} ({})?</p>\n<form method=\"post\" action=\"/delete/{}/\"><button type=\"submit\">Delete</button></form>\n<p><a href=\"/list/\">Cancel</a></p>\n",
        escape(&employee.employee_name),
        escape(&employee.employee_id),
        id
    )
}

fn input(kind: &str, name: &str, value: &str) -> String {
    format!(
        "<label>{} <input type=\"{}\" name=\"{}\" value=\"{}\"></label>\n",
        escape(&crate::forms::humanize(name)),
        kind,
        name,
        escape(value)
    )
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}
