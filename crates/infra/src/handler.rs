//! Generic resource endpoint handler.
//!
//! One `ResourceHandler<R>` serves one collection. Every transport (HTTP
//! routes, Lambda proxy events) normalizes its input into a
//! [`ResourceRequest`] and hands it to [`ResourceHandler::handle`]:
//!
//! ```text
//! ResourceRequest (method, id, query, body)
//!   ↓
//! 1. Dispatch on (method, id presence)
//!   ↓
//! 2. Decode body into R::Draft / R::Patch (BadRequest on malformed input)
//!   ↓
//! 3. Single atomic collection operation
//!   ↓
//! Reply (status, JSON body)  or  DomainError
//! ```
//!
//! Errors never leave partial state behind: validation happens before the
//! collection is touched, and updates run under the collection's lock.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};

use gatewaysim_core::{
    DomainError, DomainResult, IdGenerator, Method, Reply, Resource, ResourceId, ResourceRequest,
};

use crate::collection::{Collection, InsertError};

/// Upper bound on fresh ids tried for a single create.
pub const MAX_ID_ATTEMPTS: usize = 8;

/// Serves list/get/create/update/delete for one resource type.
pub struct ResourceHandler<R: Resource> {
    collection: Arc<dyn Collection<R>>,
    ids: Arc<dyn IdGenerator>,
}

impl<R: Resource> Clone for ResourceHandler<R> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            ids: self.ids.clone(),
        }
    }
}

impl<R: Resource> ResourceHandler<R> {
    pub fn new(collection: Arc<dyn Collection<R>>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { collection, ids }
    }

    pub fn collection(&self) -> &Arc<dyn Collection<R>> {
        &self.collection
    }

    /// Number of records currently held.
    pub fn count(&self) -> DomainResult<usize> {
        self.collection.len()
    }

    /// Route a normalized request to the matching operation.
    pub fn handle(&self, request: ResourceRequest) -> DomainResult<Reply> {
        let ResourceRequest {
            method, id, body, ..
        } = request;

        let result = match (method, id) {
            (Method::Get, None) => self.list(),
            (Method::Get, Some(id)) => self.get(&id),
            (Method::Post, _) => self.create(body),
            (Method::Put, Some(id)) => self.update(&id, body),
            (Method::Delete, Some(id)) => self.delete(&id),
            (Method::Put | Method::Delete, None) => Err(self.missing()),
        };

        if let Err(err) = &result {
            tracing::debug!(kind = R::KIND.plural, %method, error = %err, "request rejected");
        }
        result
    }

    pub fn list(&self) -> DomainResult<Reply> {
        let records = self.collection.list()?;
        let count = records.len();
        Ok(Reply::ok(envelope([
            (R::KIND.plural, to_json(&records)?),
            ("count", JsonValue::from(count)),
        ])))
    }

    pub fn get(&self, id: &ResourceId) -> DomainResult<Reply> {
        let record = self.collection.get(id)?.ok_or_else(|| self.missing())?;
        Ok(Reply::ok(envelope([(R::KIND.singular, to_json(&record)?)])))
    }

    pub fn create(&self, body: Option<JsonValue>) -> DomainResult<Reply> {
        let draft: R::Draft = decode(body)?;
        // Validate once; ids are only drawn for drafts that pass.
        let template = R::from_draft(ResourceId::new(""), draft, Utc::now())?;

        for _ in 0..MAX_ID_ATTEMPTS {
            let record = template.clone().with_id(self.ids.next_id());
            let id = record.id().clone();
            let json = to_json(&record)?;

            match self.collection.insert(record) {
                Ok(()) => {
                    tracing::info!(kind = R::KIND.plural, %id, "record created");
                    return Ok(Reply::created(self.confirmation("created", json)));
                }
                Err(InsertError::DuplicateId(taken)) => {
                    tracing::warn!(
                        kind = R::KIND.plural,
                        id = %taken,
                        "generated id already taken"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(DomainError::internal(format!(
            "could not allocate a unique {} id after {MAX_ID_ATTEMPTS} attempts",
            R::KIND.singular
        )))
    }

    pub fn update(&self, id: &ResourceId, body: Option<JsonValue>) -> DomainResult<Reply> {
        let patch: R::Patch = match body {
            None | Some(JsonValue::Null) => R::Patch::default(),
            Some(body) => decode(Some(body))?,
        };

        // The closure runs at most once; the patch is moved out on that call.
        let mut patch = Some(patch);
        let updated = self
            .collection
            .update(id, &mut |record: &mut R| match patch.take() {
                Some(p) => record.apply_patch(p),
                None => Ok(()),
            })?
            .ok_or_else(|| self.missing())?;

        tracing::info!(kind = R::KIND.plural, %id, "record updated");
        Ok(Reply::ok(self.confirmation("updated", to_json(&updated)?)))
    }

    pub fn delete(&self, id: &ResourceId) -> DomainResult<Reply> {
        let removed = self.collection.remove(id)?.ok_or_else(|| self.missing())?;
        tracing::info!(kind = R::KIND.plural, %id, "record deleted");
        Ok(Reply::ok(self.confirmation("deleted", to_json(&removed)?)))
    }

    fn missing(&self) -> DomainError {
        DomainError::not_found(format!("{} not found", R::KIND.label))
    }

    fn confirmation(&self, verb: &str, record: JsonValue) -> JsonValue {
        envelope([
            (
                "message",
                JsonValue::from(format!("{} {verb} successfully", R::KIND.label)),
            ),
            (R::KIND.singular, record),
        ])
    }
}

fn envelope<const N: usize>(fields: [(&str, JsonValue); N]) -> JsonValue {
    let map: Map<String, JsonValue> = fields
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    JsonValue::Object(map)
}

fn to_json<T: Serialize>(value: &T) -> DomainResult<JsonValue> {
    serde_json::to_value(value).map_err(|e| DomainError::internal(format!("serialize: {e}")))
}

/// Decode a request body; an absent body decodes as `{}`.
fn decode<T: DeserializeOwned>(body: Option<JsonValue>) -> DomainResult<T> {
    let body = body.unwrap_or_else(|| JsonValue::Object(Map::new()));
    if !body.is_object() {
        return Err(DomainError::bad_request("Request body must be a JSON object"));
    }
    serde_json::from_value(body)
        .map_err(|e| DomainError::bad_request(format!("Invalid request body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::InMemoryCollection;
    use gatewaysim_core::{ReplyStatus, SequentialIds};
    use gatewaysim_users::User;
    use proptest::prelude::*;
    use serde_json::json;
    use std::collections::HashSet;

    fn handler() -> ResourceHandler<User> {
        ResourceHandler::new(
            Arc::new(InMemoryCollection::<User>::new()),
            Arc::new(SequentialIds::default()),
        )
    }

    fn create(h: &ResourceHandler<User>, name: &str, email: &str) -> JsonValue {
        let reply = h
            .create(Some(json!({ "name": name, "email": email })))
            .unwrap();
        assert_eq!(reply.status, ReplyStatus::Created);
        reply.body["user"].clone()
    }

    fn id_of(user: &JsonValue) -> ResourceId {
        ResourceId::from(user["id"].as_str().unwrap())
    }

    /// Always hands out the same id.
    struct StuckIds;

    impl IdGenerator for StuckIds {
        fn next_id(&self) -> ResourceId {
            ResourceId::from("1")
        }
    }

    #[test]
    fn list_reports_records_and_count() {
        let h = handler();
        create(&h, "John Doe", "john@example.com");
        create(&h, "Jane Smith", "jane@example.com");

        let reply = h.handle(ResourceRequest::new(Method::Get, None)).unwrap();
        assert_eq!(reply.status, ReplyStatus::Ok);
        assert_eq!(reply.body["count"], 2);
        assert_eq!(reply.body["users"][1]["name"], "Jane Smith");
    }

    #[test]
    fn create_reply_carries_message_and_record() {
        let h = handler();
        let reply = h
            .create(Some(json!({ "name": "A", "email": "a@x.com" })))
            .unwrap();
        assert_eq!(reply.body["message"], "User created successfully");
        assert_eq!(reply.body["user"]["id"], "1");
        assert_eq!(reply.body["user"]["role"], "user");
    }

    #[test]
    fn create_rejects_non_object_body() {
        let h = handler();
        let err = h.create(Some(json!(["name", "email"]))).unwrap_err();
        assert!(matches!(err, DomainError::BadRequest(_)));
        assert_eq!(h.count().unwrap(), 0);
    }

    #[test]
    fn create_without_body_is_bad_request() {
        let h = handler();
        let err = h.handle(ResourceRequest::new(Method::Post, None)).unwrap_err();
        assert_eq!(err, DomainError::bad_request("Name and email are required"));
    }

    #[test]
    fn create_gives_up_when_ids_keep_colliding() {
        let h: ResourceHandler<User> =
            ResourceHandler::new(Arc::new(InMemoryCollection::new()), Arc::new(StuckIds));
        create(&h, "First", "first@example.com");

        let err = h
            .create(Some(json!({ "name": "Second", "email": "second@example.com" })))
            .unwrap_err();
        assert!(matches!(err, DomainError::Internal(_)));
        assert_eq!(h.count().unwrap(), 1);
    }

    #[test]
    fn create_skips_ids_already_taken_by_seed() {
        let collection = Arc::new(InMemoryCollection::<User>::new());
        let seeded: ResourceHandler<User> =
            ResourceHandler::new(collection.clone(), Arc::new(SequentialIds::starting_at(1)));
        create(&seeded, "Seed", "seed@example.com");

        // A fresh counter starting at 1 must step past the taken id.
        let h: ResourceHandler<User> =
            ResourceHandler::new(collection, Arc::new(SequentialIds::starting_at(1)));
        let user = create(&h, "Next", "next@example.com");
        assert_eq!(user["id"], "2");
    }

    #[test]
    fn rejected_create_does_not_consume_an_id() {
        let h = handler();
        create(&h, "First", "first@example.com");

        let err = h.create(Some(json!({ "name": "NoEmail" }))).unwrap_err();
        assert!(matches!(err, DomainError::BadRequest(_)));

        let user = create(&h, "Second", "second@example.com");
        assert_eq!(user["id"], "2");
    }

    #[test]
    fn put_and_delete_without_id_are_not_found() {
        let h = handler();
        for method in [Method::Put, Method::Delete] {
            let err = h.handle(ResourceRequest::new(method, None)).unwrap_err();
            assert_eq!(err, DomainError::not_found("User not found"));
        }
    }

    #[test]
    fn update_with_null_body_changes_nothing() {
        let h = handler();
        let user = create(&h, "A", "a@x.com");

        let reply = h.update(&id_of(&user), Some(JsonValue::Null)).unwrap();
        assert_eq!(reply.body["user"], user);
        assert_eq!(reply.body["message"], "User updated successfully");
    }

    #[test]
    fn update_rejects_wrong_field_type() {
        let h = handler();
        let user = create(&h, "A", "a@x.com");

        let err = h.update(&id_of(&user), Some(json!({ "name": 42 }))).unwrap_err();
        assert!(matches!(err, DomainError::BadRequest(_)));
        let reply = h.get(&id_of(&user)).unwrap();
        assert_eq!(reply.body["user"], user);
    }

    #[test]
    fn end_to_end_lifecycle() {
        let h = handler();
        let created = create(&h, "A", "a@x.com");
        let id = id_of(&created);

        let fetched = h
            .handle(ResourceRequest::new(Method::Get, Some(id.clone())))
            .unwrap();
        assert_eq!(fetched.body["user"], created);

        h.handle(
            ResourceRequest::new(Method::Put, Some(id.clone()))
                .with_body(Some(json!({ "name": "B" }))),
        )
        .unwrap();
        let fetched = h.get(&id).unwrap();
        assert_eq!(fetched.body["user"]["name"], "B");
        assert_eq!(fetched.body["user"]["email"], "a@x.com");

        let deleted = h
            .handle(ResourceRequest::new(Method::Delete, Some(id.clone())))
            .unwrap();
        assert_eq!(deleted.body["message"], "User deleted successfully");

        let err = h.get(&id).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    proptest! {
        /// Property: every successful create yields an id unique within the collection.
        #[test]
        fn created_ids_are_unique(n in 1usize..40) {
            let h = handler();
            let mut seen = HashSet::new();
            for i in 0..n {
                let user = create(&h, &format!("user{i}"), &format!("u{i}@x.com"));
                prop_assert!(seen.insert(id_of(&user)));
            }
            prop_assert_eq!(h.count().unwrap(), n);
        }

        /// Property: a create missing name or email is rejected and changes nothing.
        #[test]
        fn incomplete_create_leaves_collection_unchanged(
            existing in 0usize..5,
            drop_name in any::<bool>(),
        ) {
            let h = handler();
            for i in 0..existing {
                create(&h, &format!("user{i}"), &format!("u{i}@x.com"));
            }
            let before = h.list().unwrap();

            let body = if drop_name {
                json!({ "email": "e@x.com" })
            } else {
                json!({ "name": "N" })
            };
            let err = h.create(Some(body)).unwrap_err();

            prop_assert!(matches!(err, DomainError::BadRequest(_)));
            prop_assert_eq!(h.list().unwrap(), before);
        }

        /// Property: get/update/delete of an unknown id is NotFound and changes nothing.
        #[test]
        fn unknown_id_is_not_found(existing in 0usize..5, probe in "[a-z]{1,6}") {
            let h = handler();
            for i in 0..existing {
                create(&h, &format!("user{i}"), &format!("u{i}@x.com"));
            }
            let before = h.list().unwrap();
            let id = ResourceId::new(probe);

            for request in [
                ResourceRequest::new(Method::Get, Some(id.clone())),
                ResourceRequest::new(Method::Put, Some(id.clone()))
                    .with_body(Some(json!({ "name": "X" }))),
                ResourceRequest::new(Method::Delete, Some(id.clone())),
            ] {
                let err = h.handle(request).unwrap_err();
                prop_assert!(matches!(err, DomainError::NotFound(_)));
            }
            prop_assert_eq!(h.list().unwrap(), before);
        }

        /// Property: a partial update changes only the supplied fields.
        #[test]
        fn partial_update_keeps_omitted_fields(new_name in "[A-Za-z]{1,12}") {
            let h = handler();
            let user = create(&h, "Original", "orig@x.com");
            let id = id_of(&user);

            let reply = h.update(&id, Some(json!({ "name": new_name.clone() }))).unwrap();
            prop_assert_eq!(&reply.body["user"]["name"], &json!(new_name));
            prop_assert_eq!(&reply.body["user"]["email"], &user["email"]);
            prop_assert_eq!(&reply.body["user"]["created_at"], &user["created_at"]);

            let unchanged = h.update(&id, Some(json!({}))).unwrap();
            prop_assert_eq!(&unchanged.body["user"], &reply.body["user"]);
        }

        /// Property: delete removes exactly one record and returns it as it was.
        #[test]
        fn delete_removes_exactly_one(n in 1usize..10, pick in any::<prop::sample::Index>()) {
            let h = handler();
            let users: Vec<_> = (0..n)
                .map(|i| create(&h, &format!("user{i}"), &format!("u{i}@x.com")))
                .collect();
            let target = &users[pick.index(n)];

            let reply = h.delete(&id_of(target)).unwrap();
            prop_assert_eq!(&reply.body["user"], target);
            prop_assert_eq!(h.count().unwrap(), n - 1);
        }
    }
}
