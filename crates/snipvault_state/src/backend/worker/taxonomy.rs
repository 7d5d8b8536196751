//! Category, tag, and collection command handlers for the backend worker.

use super::WorkerState;
use crate::backend::{CoreErrorSource, CoreEvent};
use snipvault_core::models::{
    CreateCategoryRequest, CreateCollectionRequest, UpdateCategoryRequest,
    UpdateCollectionRequest,
};

pub(super) fn handle_list_categories(state: &mut WorkerState) {
    match state.api.list_categories() {
        Ok(items) => state.send(CoreEvent::CategoriesLoaded { items }),
        Err(err) => state.fail("Load categories", CoreErrorSource::Other, err),
    }
}

pub(super) fn handle_create_category(state: &mut WorkerState, request: CreateCategoryRequest) {
    match state.api.create_category(&request) {
        Ok(category) => state.send(CoreEvent::CategorySaved { category }),
        Err(err) => state.fail("Create category", CoreErrorSource::Other, err),
    }
}

pub(super) fn handle_update_category(
    state: &mut WorkerState,
    id: String,
    request: UpdateCategoryRequest,
) {
    let action = if request.new_parent().is_some() && request.name.is_none() {
        "Move category"
    } else {
        "Update category"
    };
    match state.api.update_category(&id, &request) {
        Ok(category) => state.send(CoreEvent::CategorySaved { category }),
        Err(err) => state.fail(action, CoreErrorSource::Other, err),
    }
}

pub(super) fn handle_delete_category(state: &mut WorkerState, id: String) {
    match state.api.delete_category(&id) {
        Ok(()) => state.send(CoreEvent::CategoryDeleted { id }),
        Err(err) => state.fail("Delete category", CoreErrorSource::Other, err),
    }
}

pub(super) fn handle_list_tags(state: &mut WorkerState) {
    match state.api.list_tags() {
        Ok(items) => state.send(CoreEvent::TagsLoaded { items }),
        Err(err) => state.fail("Load tags", CoreErrorSource::Other, err),
    }
}

pub(super) fn handle_create_tag(state: &mut WorkerState, name: String) {
    match state.api.create_tag(&name) {
        Ok(tag) => state.send(CoreEvent::TagCreated { tag }),
        Err(err) => state.fail("Create tag", CoreErrorSource::TagCreate { name }, err),
    }
}

pub(super) fn handle_rename_tag(state: &mut WorkerState, id: String, name: String) {
    match state.api.rename_tag(&id, &name) {
        Ok(tag) => state.send(CoreEvent::TagSaved { tag }),
        Err(err) => state.fail("Rename tag", CoreErrorSource::Other, err),
    }
}

pub(super) fn handle_delete_tag(state: &mut WorkerState, id: String) {
    match state.api.delete_tag(&id) {
        Ok(()) => state.send(CoreEvent::TagDeleted { id }),
        Err(err) => state.fail("Delete tag", CoreErrorSource::Other, err),
    }
}

pub(super) fn handle_list_collections(state: &mut WorkerState) {
    match state.api.list_collections() {
        Ok(items) => state.send(CoreEvent::CollectionsLoaded { items }),
        Err(err) => state.fail("Load collections", CoreErrorSource::Other, err),
    }
}

pub(super) fn handle_create_collection(
    state: &mut WorkerState,
    request: CreateCollectionRequest,
) {
    match state.api.create_collection(&request) {
        Ok(collection) => state.send(CoreEvent::CollectionSaved { collection }),
        Err(err) => state.fail("Create collection", CoreErrorSource::Other, err),
    }
}

pub(super) fn handle_update_collection(
    state: &mut WorkerState,
    id: String,
    request: UpdateCollectionRequest,
) {
    match state.api.update_collection(&id, &request) {
        Ok(collection) => state.send(CoreEvent::CollectionSaved { collection }),
        Err(err) => state.fail("Update collection", CoreErrorSource::Other, err),
    }
}

pub(super) fn handle_delete_collection(state: &mut WorkerState, id: String) {
    match state.api.delete_collection(&id) {
        Ok(()) => state.send(CoreEvent::CollectionDeleted { id }),
        Err(err) => state.fail("Delete collection", CoreErrorSource::Other, err),
    }
}

pub(super) fn handle_membership(
    state: &mut WorkerState,
    collection_id: String,
    snippet_id: String,
    member: bool,
) {
    let result = if member {
        state.api.add_to_collection(&collection_id, &snippet_id)
    } else {
        state.api.remove_from_collection(&collection_id, &snippet_id)
    };
    match result {
        Ok(()) => state.send(CoreEvent::CollectionMembershipChanged {
            collection_id,
            snippet_id,
            member,
        }),
        Err(err) => {
            let action = if member {
                "Add to collection"
            } else {
                "Remove from collection"
            };
            state.fail(action, CoreErrorSource::Other, err);
        }
    }
}
