//! Employee record flows. All of them require a signed-in session.

use super::{decode, expect_status, on_failure, send_json, Message, Outcome, Page, View};
use crate::auth::SessionCookies;
use crate::forms::{self, EmployeeInput};
use crate::services::backend::{employee_path, EMPLOYEES_PATH};
use crate::services::{ApiRequest, Backend, ErrorDetail, ErrorOutcome};
use empdesk_protocol::EmployeeRecord;
use reqwest::StatusCode;

pub const CREATED: &str = "Employee created successfully.";
pub const UPDATED: &str = "Employee updated successfully.";
pub const DELETED: &str = "Employee deleted successfully.";
pub const NOT_FOUND: &str = "Employee not found.";

pub async fn list(backend: &dyn Backend, session: &SessionCookies) -> Outcome {
    let Some(token) = session.bearer_token() else {
        return Outcome::sign_in_required();
    };

    let request = ApiRequest::get(EMPLOYEES_PATH).bearer(token);
    let result = expect_status(backend, request, StatusCode::OK)
        .await
        .and_then(|response| decode::<Vec<EmployeeRecord>>(&response));

    match result {
        Ok(employees) => {
            tracing::debug!(count = employees.len(), "Fetched employees");
            Outcome::render(View::EmployeeList { employees })
        }
        Err(error) => on_failure(error, |messages| {
            Outcome::render(View::EmployeeList { employees: Vec::new() }).with_errors(messages)
        }),
    }
}

pub fn new_form(session: &SessionCookies) -> Outcome {
    if !session.is_authenticated() {
        return Outcome::sign_in_required();
    }

    Outcome::render(View::CreateEmployee {
        form: EmployeeInput::default(),
    })
}

pub async fn create(
    backend: &dyn Backend,
    session: &SessionCookies,
    input: EmployeeInput,
) -> Outcome {
    let Some(token) = session.bearer_token() else {
        return Outcome::sign_in_required();
    };

    let record = match forms::validate_employee(&input) {
        Ok(record) => record,
        Err(errors) => {
            return Outcome::render(View::CreateEmployee { form: input })
                .with_errors(errors.messages());
        }
    };

    let request = ApiRequest::post(EMPLOYEES_PATH).bearer(token);

    match send_json(backend, request, &record, StatusCode::CREATED).await {
        Ok(_) => {
            tracing::info!(employee_id = %record.employee_id, "Employee created");
            Outcome::redirect(Page::EmployeeList).with_message(Message::success(CREATED))
        }
        Err(error) => on_failure(error, |messages| {
            Outcome::render(View::CreateEmployee { form: input }).with_errors(messages)
        }),
    }
}

/// Pre-filled edit page for an existing record
pub async fn edit(backend: &dyn Backend, session: &SessionCookies, id: u64) -> Outcome {
    let Some(token) = session.bearer_token() else {
        return Outcome::sign_in_required();
    };

    match fetch(backend, token, id).await {
        Ok(employee) => Outcome::render(View::UpdateEmployee {
            id,
            form: employee.into(),
        }),
        Err(error) => on_failure(error, back_to_list),
    }
}

pub async fn update(
    backend: &dyn Backend,
    session: &SessionCookies,
    id: u64,
    input: EmployeeInput,
) -> Outcome {
    let Some(token) = session.bearer_token() else {
        return Outcome::sign_in_required();
    };

    let record = match forms::validate_employee(&input) {
        Ok(record) => record,
        Err(errors) => {
            return Outcome::render(View::UpdateEmployee { id, form: input })
                .with_errors(errors.messages());
        }
    };

    let request = ApiRequest::patch(employee_path(id)).bearer(token);

    match send_json(backend, request, &record, StatusCode::OK).await {
        Ok(_) => {
            tracing::info!(id, "Employee updated");
            Outcome::redirect(Page::EmployeeList).with_message(Message::success(UPDATED))
        }
        Err(error) => on_failure(error, |messages| {
            Outcome::render(View::UpdateEmployee { id, form: input }).with_errors(messages)
        }),
    }
}

/// Confirmation page shown before a delete
pub async fn confirm_delete(backend: &dyn Backend, session: &SessionCookies, id: u64) -> Outcome {
    let Some(token) = session.bearer_token() else {
        return Outcome::sign_in_required();
    };

    match fetch(backend, token, id).await {
        Ok(employee) => Outcome::render(View::DeleteEmployee { id, employee }),
        Err(error) => on_failure(error, back_to_list),
    }
}

pub async fn delete(backend: &dyn Backend, session: &SessionCookies, id: u64) -> Outcome {
    let Some(token) = session.bearer_token() else {
        return Outcome::sign_in_required();
    };

    let request = ApiRequest::delete(employee_path(id)).bearer(token);

    match expect_status(backend, request, StatusCode::NO_CONTENT).await {
        Ok(_) => {
            tracing::info!(id, "Employee deleted");
            Outcome::redirect(Page::EmployeeList).with_message(Message::success(DELETED))
        }
        Err(error) => on_failure(error, |messages| {
            Outcome::redirect(Page::EmployeeList).with_errors(messages)
        }),
    }
}

async fn fetch(
    backend: &dyn Backend,
    token: &str,
    id: u64,
) -> Result<EmployeeRecord, ErrorOutcome> {
    let request = ApiRequest::get(employee_path(id)).bearer(token);
    match expect_status(backend, request, StatusCode::OK).await {
        Ok(response) => decode(&response),
        Err(ErrorOutcome::ApiRejected { status, .. }) if status == StatusCode::NOT_FOUND => {
            Err(ErrorOutcome::ApiRejected {
                status,
                detail: ErrorDetail::PlainMessage(NOT_FOUND.to_string()),
            })
        }
        Err(error) => Err(error),
    }
}

fn back_to_list(messages: Vec<String>) -> Outcome {
    Outcome::redirect(Page::EmployeeList).with_errors(messages)
}
