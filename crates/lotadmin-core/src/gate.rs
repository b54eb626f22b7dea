//! Authorization gate — request-boundary role enforcement.
//!
//! The gate is a pure function of (request context, requirement). It
//! never performs I/O: the actor identity was resolved from the session
//! earlier in the request, and denials are rendered by the caller
//! according to its declared response style. Denied checks emit a
//! `tracing` warning as operational telemetry; they are deliberately
//! not business audit records.

use serde::Serialize;

use crate::error::AdminError;
use crate::models::actor::ActorIdentity;
use crate::models::role::Role;

/// How the caller wants failures rendered. Supplied by the response
/// collaborator, never inferred from the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStyle {
    /// Flash message + redirect.
    Browser,
    /// Structured JSON failure payload.
    Api,
}

/// Per-request context the gate evaluates against.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// `None` when the request carries no valid session.
    pub actor: Option<ActorIdentity>,
    /// Originally requested destination, remembered across the login
    /// redirect.
    pub path: String,
}

/// A capability requirement for a handler.
#[derive(Debug, Clone)]
pub enum Requirement {
    /// Hierarchical: any role ranking at or above the given role.
    AtLeast(Role),
    /// Exact allow-list, for gates that are not strictly hierarchical.
    OneOf(Vec<Role>),
}

impl Requirement {
    fn allows(&self, role: Role) -> bool {
        match self {
            Requirement::AtLeast(required) => role.satisfies(*required),
            Requirement::OneOf(allowed) => role.in_set(allowed),
        }
    }

    /// The weakest role that would satisfy this requirement, for error
    /// messages. For an empty allow-list this is `Admin` (nothing
    /// passes anyway).
    fn weakest_allowed(&self) -> Role {
        match self {
            Requirement::AtLeast(required) => *required,
            Requirement::OneOf(allowed) => {
                allowed.iter().copied().min().unwrap_or(Role::Admin)
            }
        }
    }
}

/// Requirements for the operations the surrounding console performs.
pub mod require {
    use super::Requirement;
    use crate::models::role::Role;

    /// Browsing lots and their images: any authenticated role.
    pub fn view_lots() -> Requirement {
        Requirement::AtLeast(Role::Viewer)
    }

    /// Editing a lot's identifying number: manager or admin.
    pub fn edit_lot_number() -> Requirement {
        Requirement::AtLeast(Role::Manager)
    }

    pub fn delete_lot() -> Requirement {
        Requirement::AtLeast(Role::Admin)
    }

    pub fn manage_accounts() -> Requirement {
        Requirement::AtLeast(Role::Admin)
    }

    pub fn view_audit_log() -> Requirement {
        Requirement::AtLeast(Role::Admin)
    }
}

/// Derived capability flags attached to the request after a successful
/// check, for downstream rendering decisions.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Capabilities {
    pub can_manage_lots: bool,
    pub can_delete_lots: bool,
    pub can_manage_accounts: bool,
    pub can_view_audit_log: bool,
    pub is_admin: bool,
}

impl Capabilities {
    pub fn for_role(role: Role) -> Self {
        Self {
            can_manage_lots: role.satisfies(Role::Manager),
            can_delete_lots: role.satisfies(Role::Admin),
            can_manage_accounts: role.satisfies(Role::Admin),
            can_view_audit_log: role.satisfies(Role::Admin),
            is_admin: role == Role::Admin,
        }
    }
}

/// A passed check: the verified actor plus their derived capabilities.
#[derive(Debug, Clone)]
pub struct Granted {
    pub actor: ActorIdentity,
    pub capabilities: Capabilities,
}

/// A failed check, before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// No actor identity on the request (401-equivalent). Carries the
    /// requested destination so the login flow can redirect back.
    AuthenticationRequired { return_to: String },
    /// Actor present but the role policy check failed (403-equivalent).
    InsufficientPermission { required: Role, actual: Role },
}

/// A denial rendered for a specific response style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeniedResponse {
    Redirect { location: String, flash: String },
    Json { status: u16, code: &'static str, message: String },
}

/// Denials are the gate-shaped view of the core error taxonomy; the
/// stable codes come from [`AdminError::code`] so the two never drift.
impl From<Denial> for AdminError {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::AuthenticationRequired { .. } => AdminError::AuthenticationRequired,
            Denial::InsufficientPermission { required, actual } => {
                AdminError::InsufficientPermission { required, actual }
            }
        }
    }
}

impl Denial {
    pub fn code(&self) -> &'static str {
        AdminError::from(self.clone()).code()
    }

    /// Render this denial for the caller's declared style.
    pub fn render(&self, style: ResponseStyle) -> DeniedResponse {
        match (self, style) {
            (Denial::AuthenticationRequired { return_to }, ResponseStyle::Browser) => {
                DeniedResponse::Redirect {
                    location: format!("/login?return_to={return_to}"),
                    flash: "Please sign in to continue.".into(),
                }
            }
            (Denial::AuthenticationRequired { .. }, ResponseStyle::Api) => DeniedResponse::Json {
                status: 401,
                code: self.code(),
                message: "authentication required".into(),
            },
            (Denial::InsufficientPermission { .. }, ResponseStyle::Browser) => {
                DeniedResponse::Redirect {
                    location: "/".into(),
                    flash: "You do not have permission to perform that action.".into(),
                }
            }
            (Denial::InsufficientPermission { required, actual }, ResponseStyle::Api) => {
                DeniedResponse::Json {
                    status: 403,
                    code: self.code(),
                    message: format!("requires {required}, actor has {actual}"),
                }
            }
        }
    }
}

/// Enforce a requirement against the request context.
///
/// On success the actor and derived capability flags are returned for
/// the handler; on failure the caller renders the [`Denial`] via
/// [`Denial::render`] and the handler never runs.
pub fn authorize(ctx: &RequestContext, requirement: &Requirement) -> Result<Granted, Denial> {
    let Some(actor) = &ctx.actor else {
        return Err(Denial::AuthenticationRequired {
            return_to: ctx.path.clone(),
        });
    };

    if !requirement.allows(actor.role) {
        tracing::warn!(
            actor_id = %actor.actor_id,
            role = %actor.role,
            path = %ctx.path,
            "permission check failed"
        );
        return Err(Denial::InsufficientPermission {
            required: requirement.weakest_allowed(),
            actual: actor.role,
        });
    }

    Ok(Granted {
        actor: actor.clone(),
        capabilities: Capabilities::for_role(actor.role),
    })
}
