//! Liveness and readiness probes.
//!
//! | Probe | Path | Answer |
//! |---|---|---|
//! | Liveness | `/healthz` | `ok` whenever the process can answer HTTP |
//! | Readiness | `/readyz` | `ready` once the store is built |
//!
//! Both are mounted by [`api::routes`](crate::api::routes). The store lives
//! in memory and is built before the server binds, so readiness has no
//! dependency to wait on.

use crate::{Request, Response};

pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

pub async fn readiness(_req: Request) -> Response {
    Response::text("ready")
}
