#![allow(dead_code)]

pub mod mock_handlers;

use cdc_dispatch::{ChangeEvent, FieldSet, Operation};

pub const CONTACT: &str = "Contact";

pub fn contact_interest() -> FieldSet {
    FieldSet::new(["FirstName", "LastName", "Email", "Phone"])
}

pub fn event(operation: Operation, id: &str) -> ChangeEvent {
    ChangeEvent::new(operation, CONTACT, [id])
}

pub fn update(id: &str, changed: &[&str]) -> ChangeEvent {
    event(Operation::Update, id).with_changed_fields(FieldSet::new(changed.iter().copied()))
}

pub fn raw(change_type: &str, id: &str) -> ChangeEvent {
    ChangeEvent::new(change_type, CONTACT, [id])
}
