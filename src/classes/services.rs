use tracing::info;

use super::dto::ClassForm;
use super::repo::ClassRepo;
use super::repo_types::{DuplicateClassName, SchoolClass};
use crate::error::{AdminError, AdminResult};
use crate::forms::{non_blank, parse_amount, NumberError};

pub async fn list_classes(repo: &dyn ClassRepo) -> AdminResult<Vec<SchoolClass>> {
    Ok(repo.list().await?)
}

async fn find_class(repo: &dyn ClassRepo, id: i32) -> AdminResult<SchoolClass> {
    repo.find(id)
        .await?
        .ok_or_else(|| AdminError::not_found("Class not found."))
}

fn name_taken(name: &str) -> AdminError {
    AdminError::validation(format!("A class named \"{name}\" already exists."))
}

/// A unique-constraint hit on write reads the same as a failed pre-check.
fn write_error(err: anyhow::Error) -> AdminError {
    match err.downcast_ref::<DuplicateClassName>() {
        Some(DuplicateClassName(name)) => name_taken(name),
        None => AdminError::Internal(err),
    }
}

/// Names are compared exactly; a class never collides with itself.
async fn ensure_name_free(
    repo: &dyn ClassRepo,
    name: &str,
    except: Option<i32>,
) -> AdminResult<()> {
    match repo.find_by_name(name).await? {
        Some(existing) if Some(existing.id) != except => Err(name_taken(name)),
        _ => Ok(()),
    }
}

pub async fn add_class(repo: &dyn ClassRepo, form: &ClassForm) -> AdminResult<String> {
    let name = non_blank(&form.name).ok_or_else(|| AdminError::validation("Class name is required."))?;
    ensure_name_free(repo, &name, None).await?;

    let amount = parse_amount(&form.rice_bowl_amount).map_err(|e| match e {
        NumberError::Negative => AdminError::validation("Initial amount cannot be negative."),
        NumberError::Invalid => {
            AdminError::validation("Please enter a valid number for the initial amount.")
        }
    })?;

    let class = repo.create(&name, amount).await.map_err(write_error)?;
    info!(class_id = class.id, name = %class.name, amount, "class added");
    Ok(format!("Class \"{name}\" added successfully."))
}

pub async fn set_class_amount(repo: &dyn ClassRepo, id: i32, raw: &str) -> AdminResult<String> {
    let class = find_class(repo, id).await?;
    let amount = parse_amount(raw).map_err(|e| match e {
        NumberError::Negative => AdminError::validation("Amount cannot be negative."),
        NumberError::Invalid => AdminError::validation("Please enter a valid number."),
    })?;

    repo.update(id, None, Some(amount))
        .await?
        .ok_or_else(|| AdminError::not_found("Class not found."))?;
    info!(class_id = id, amount, "class total updated");
    Ok(format!("Updated {} to ${amount:.2}.", class.name))
}

/// Full-page edit: blank fields keep their current value.
pub async fn update_class(repo: &dyn ClassRepo, id: i32, form: &ClassForm) -> AdminResult<String> {
    let class = find_class(repo, id).await?;

    let name = non_blank(&form.name).filter(|n| *n != class.name);
    if let Some(name) = &name {
        ensure_name_free(repo, name, Some(id)).await?;
    }

    let amount = match non_blank(&form.rice_bowl_amount) {
        None => None,
        Some(raw) => Some(parse_amount(&raw).map_err(|e| match e {
            NumberError::Negative => AdminError::validation("Amount cannot be negative."),
            NumberError::Invalid => {
                AdminError::validation("Please enter a valid number for the amount.")
            }
        })?),
    };

    let updated = repo
        .update(id, name.as_deref(), amount)
        .await
        .map_err(write_error)?
        .ok_or_else(|| AdminError::not_found("Class not found."))?;
    info!(class_id = id, name = %updated.name, "class updated");
    Ok(format!("Class \"{}\" updated successfully.", updated.name))
}

/// Inline rename. Returns the stored name.
pub async fn rename_class(repo: &dyn ClassRepo, id: i32, new_name: &str) -> AdminResult<String> {
    let class = repo
        .find(id)
        .await?
        .ok_or_else(|| AdminError::not_found("Class not found"))?;
    let name = non_blank(new_name).ok_or_else(|| AdminError::validation("Class name is required"))?;

    if name == class.name {
        return Ok(class.name);
    }
    ensure_name_free(repo, &name, Some(id)).await?;

    let updated = repo
        .update(id, Some(&name), None)
        .await
        .map_err(write_error)?
        .ok_or_else(|| AdminError::not_found("Class not found"))?;
    info!(class_id = id, from = %class.name, to = %updated.name, "class renamed");
    Ok(updated.name)
}

pub async fn delete_class(repo: &dyn ClassRepo, id: i32) -> AdminResult<String> {
    let class = find_class(repo, id).await?;
    if !repo.delete(id).await? {
        return Err(AdminError::not_found("Class not found."));
    }
    info!(class_id = id, name = %class.name, "class deleted");
    Ok(format!("Class \"{}\" deleted successfully.", class.name))
}
