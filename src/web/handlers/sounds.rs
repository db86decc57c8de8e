// SPDX-License-Identifier: GPL-2.0-or-later
use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Extension, Query},
    http::Method,
};
use tracing::instrument;

use crate::db::Catalog;
use crate::handler::{self, Event, Response};

/// Translate an HTTP request into a platform invocation and run the handler on it.
///
/// Empty bodies and query strings become absent fields, the same as the platform
/// delivers them. Bodies that aren't UTF-8 are passed on lossily and left for the handler
/// to judge.
#[instrument(skip(catalog, body))]
pub async fn invoke(
    Extension(catalog): Extension<Arc<dyn Catalog>>,
    method: Method,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<Response, crate::Error> {
    let event = Event {
        http_method: method.as_str().to_string(),
        body: (!body.is_empty()).then(|| String::from_utf8_lossy(&body).into_owned()),
        query_string_parameters: (!query.is_empty()).then_some(query),
    };
    handler::handle(catalog.as_ref(), &event).await
}
