// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Logs `METHOD /path STATUS DURATIONms` under target `http`.
///
/// 2xx/3xx at debug, 4xx at warn, 5xx at error. Rosetta reports every API
/// error as a 500, so failed calls surface at error level.
pub async fn http_logger_middleware(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(req).await;

    let duration_ms = start.elapsed().as_millis();
    let status = response.status().as_u16();

    match status {
        200..=399 => tracing::debug!(
            target: "http",
            method = %method, path = %path, status, duration_ms,
            "{} {} {} {}ms", method, path, status, duration_ms
        ),
        400..=499 => tracing::warn!(
            target: "http",
            method = %method, path = %path, status, duration_ms,
            "{} {} {} {}ms", method, path, status, duration_ms
        ),
        _ => tracing::error!(
            target: "http",
            method = %method, path = %path, status, duration_ms,
            "{} {} {} {}ms", method, path, status, duration_ms
        ),
    }

    response
}
