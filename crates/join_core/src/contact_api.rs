use crate::error::AppError;
use crate::ids;
use crate::model::Contact;
use crate::storage::CONTACTS_KEY;
use crate::storage::sync::SyncedStore;
use crate::text::{capitalize_first, contains_ignore_case};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDraft {
    /// "First Last"; everything after the first word is the last name.
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ContactPatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Address book. Tasks keep their own copies of assigned contacts, so nothing
/// here reaches into the task list.
pub struct ContactRepository {
    store: Arc<SyncedStore>,
    contacts: Vec<Contact>,
}

impl ContactRepository {
    pub fn load(store: Arc<SyncedStore>) -> Result<Self, AppError> {
        let contacts: Vec<Contact> = store.read(CONTACTS_KEY)?.unwrap_or_default();
        if let Some(id) = ids::first_duplicate(&contacts) {
            return Err(AppError::invalid_data(format!(
                "stored contacts contain id {id} more than once"
            )));
        }
        Ok(Self { store, contacts })
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn get(&self, id: u64) -> Result<&Contact, AppError> {
        self.contacts
            .iter()
            .find(|contact| contact.id == id)
            .ok_or_else(|| AppError::contact_not_found(id))
    }

    /// Contacts ordered by first name, ignoring case.
    pub fn sorted(&self) -> Vec<Contact> {
        let mut sorted = self.contacts.clone();
        sorted.sort_by_key(|contact| contact.name.to_lowercase());
        sorted
    }

    /// Substring match on first or last name.
    pub fn filter(&self, query: &str) -> Vec<Contact> {
        filter_contacts(&self.contacts, query)
    }

    pub fn create(&mut self, draft: ContactDraft) -> Result<Contact, AppError> {
        let (name, last_name) = split_full_name(&draft.full_name)?;
        let id = ids::next_id(&self.contacts);
        let contact = Contact {
            id,
            name,
            last_name,
            email: draft.email.trim().to_string(),
            phone: draft.phone.trim().to_string(),
            color: Contact::color_for(id).to_string(),
        };

        ids::ensure_unique(&self.contacts, contact.id)?;
        let mut next = self.contacts.clone();
        next.push(contact.clone());
        self.commit(next)?;
        info!(contact_id = id, "contact created");
        Ok(contact)
    }

    pub fn update(&mut self, id: u64, patch: ContactPatch) -> Result<Contact, AppError> {
        let mut next = self.contacts.clone();
        let contact = next
            .iter_mut()
            .find(|contact| contact.id == id)
            .ok_or_else(|| AppError::contact_not_found(id))?;

        if let Some(full_name) = patch.full_name.as_deref() {
            let (name, last_name) = split_full_name(full_name)?;
            contact.name = name;
            contact.last_name = last_name;
        }
        if let Some(email) = patch.email {
            contact.email = email.trim().to_string();
        }
        if let Some(phone) = patch.phone {
            contact.phone = phone.trim().to_string();
        }

        let updated = contact.clone();
        self.commit(next)?;
        info!(contact_id = id, "contact updated");
        Ok(updated)
    }

    pub fn remove(&mut self, id: u64) -> Result<Contact, AppError> {
        let index = self
            .contacts
            .iter()
            .position(|contact| contact.id == id)
            .ok_or_else(|| AppError::contact_not_found(id))?;

        let mut next = self.contacts.clone();
        let removed = next.remove(index);
        self.commit(next)?;
        info!(contact_id = id, "contact removed");
        Ok(removed)
    }

    fn commit(&mut self, next: Vec<Contact>) -> Result<(), AppError> {
        self.store.write(CONTACTS_KEY, &next)?;
        self.contacts = next;
        Ok(())
    }
}

pub fn filter_contacts(contacts: &[Contact], query: &str) -> Vec<Contact> {
    let query = query.trim();
    contacts
        .iter()
        .filter(|contact| {
            query.is_empty()
                || contains_ignore_case(&contact.name, query)
                || contains_ignore_case(&contact.last_name, query)
        })
        .cloned()
        .collect()
}

fn split_full_name(full_name: &str) -> Result<(String, String), AppError> {
    let mut parts = full_name.split_whitespace();
    let first = parts.next();
    let rest = parts.collect::<Vec<_>>().join(" ");
    match first {
        Some(first) if !rest.is_empty() => Ok((capitalize_first(first), capitalize_first(&rest))),
        _ => Err(AppError::invalid_input(
            "full name needs a first and a last name",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::{ContactDraft, ContactPatch, ContactRepository};
    use crate::model::{CONTACT_PALETTE, Contact};
    use crate::storage::CONTACTS_KEY;
    use crate::storage::json_store::LocalMirror;
    use crate::storage::sync::SyncedStore;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(file_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("join-{nanos}-{file_name}"))
    }

    fn store(path: &PathBuf) -> Arc<SyncedStore> {
        Arc::new(SyncedStore::local_only(LocalMirror::new(path)))
    }

    fn draft(full_name: &str) -> ContactDraft {
        ContactDraft {
            full_name: full_name.to_string(),
            email: " anna@example.com ".to_string(),
            phone: "0151 123".to_string(),
        }
    }

    fn contact(id: u64, name: &str, last_name: &str) -> Contact {
        Contact {
            id,
            name: name.to_string(),
            last_name: last_name.to_string(),
            email: String::new(),
            phone: String::new(),
            color: "red".to_string(),
        }
    }

    #[test]
    fn create_splits_and_capitalizes_name() {
        let path = temp_path("contacts-create.json");
        let mut repo = ContactRepository::load(store(&path)).unwrap();

        let created = repo.create(draft("anna VON berg")).unwrap();
        let reloaded = ContactRepository::load(store(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(created.id, 1);
        assert_eq!(created.name, "Anna");
        assert_eq!(created.last_name, "Von berg");
        assert_eq!(created.email, "anna@example.com");
        assert_eq!(created.color, CONTACT_PALETTE[1]);
        assert_eq!(reloaded.contacts(), repo.contacts());
    }

    #[test]
    fn create_requires_two_name_parts() {
        let path = temp_path("contacts-one-name.json");
        let mut repo = ContactRepository::load(store(&path)).unwrap();

        let err = repo.create(draft("Anna")).unwrap_err();

        assert_eq!(err.code(), "invalid_input");
        assert!(repo.contacts().is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn sorted_orders_by_first_name_ignoring_case() {
        let path = temp_path("contacts-sorted.json");
        let shared = store(&path);
        shared
            .write(
                CONTACTS_KEY,
                &vec![
                    contact(1, "zoe", "A"),
                    contact(2, "Bert", "B"),
                    contact(3, "anna", "C"),
                ],
            )
            .unwrap();
        let repo = ContactRepository::load(shared).unwrap();
        std::fs::remove_file(&path).ok();

        let names: Vec<String> = repo.sorted().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["anna", "Bert", "zoe"]);
    }

    #[test]
    fn filter_matches_first_or_last_name() {
        let path = temp_path("contacts-filter.json");
        let shared = store(&path);
        shared
            .write(
                CONTACTS_KEY,
                &vec![contact(1, "Anna", "Schmidt"), contact(2, "Bert", "Hansen")],
            )
            .unwrap();
        let repo = ContactRepository::load(shared).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(repo.filter("SCHM").len(), 1);
        assert_eq!(repo.filter("bert")[0].id, 2);
        assert_eq!(repo.filter("").len(), 2);
        assert!(repo.filter("zzz").is_empty());
    }

    #[test]
    fn update_and_remove_contact() {
        let path = temp_path("contacts-update.json");
        let mut repo = ContactRepository::load(store(&path)).unwrap();
        let first = repo.create(draft("Anna Schmidt")).unwrap();
        let second = repo.create(draft("Bert Hansen")).unwrap();

        let updated = repo
            .update(
                first.id,
                ContactPatch {
                    phone: Some("999".to_string()),
                    ..ContactPatch::default()
                },
            )
            .unwrap();
        let removed = repo.remove(second.id).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(updated.phone, "999");
        assert_eq!(updated.name, "Anna");
        assert_eq!(removed.name, "Bert");
        assert_eq!(repo.contacts().len(), 1);
    }

    #[test]
    fn missing_contact_is_not_found() {
        let path = temp_path("contacts-missing.json");
        let mut repo = ContactRepository::load(store(&path)).unwrap();

        assert_eq!(repo.remove(4).unwrap_err().code(), "not_found");
        assert_eq!(
            repo.update(4, ContactPatch::default()).unwrap_err().code(),
            "not_found"
        );
    }

    #[test]
    fn load_rejects_duplicate_ids() {
        let path = temp_path("contacts-dup.json");
        let shared = store(&path);
        shared
            .write(
                CONTACTS_KEY,
                &vec![contact(1, "A", "B"), contact(1, "C", "D")],
            )
            .unwrap();

        let err = ContactRepository::load(shared).err().unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(err.code(), "invalid_data");
    }
}
