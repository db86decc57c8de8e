// SPDX-License-Identifier: GPL-2.0-or-later
use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, Json};
use tracing::{error, instrument};

use crate::{api::Status, db::Catalog};

/// Reports on the health of the web server.
#[instrument(skip(catalog))]
pub async fn get(
    Extension(catalog): Extension<Arc<dyn Catalog>>,
) -> Result<Json<Status>, StatusCode> {
    match catalog.server_version().await {
        Ok(db_version) => Ok(Status { db_version }.into()),
        Err(err) => {
            error!("Database is unavailable: {:?}", err);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
