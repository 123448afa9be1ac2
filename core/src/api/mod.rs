//! Entity endpoints. Each module adds an `impl NetdataClient` block for one
//! family of REST resources.
//!
//! The remote API exposes list endpoints only for most entities, so the
//! `get_*` operations list and scan linearly, failing with
//! `ApiError::NotFound` when nothing matches.

mod invitations;
mod members;
mod nodes;
mod notifications;
mod room_members;
mod rooms;
mod rules;
mod spaces;
