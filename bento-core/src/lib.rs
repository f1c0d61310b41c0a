//! Bento Core - Entity Types
//!
//! Pure data structures shared by the storage layer, the API client and the
//! console. Nothing in this crate performs I/O.

pub mod datetime;
pub mod entities;
pub mod error;
pub mod filter;
pub mod identity;
pub mod language;
pub mod requests;
pub mod roles;

pub use datetime::{format_datetime_in, format_local_datetime};
pub use entities::{
    ApiEnvelope, KeyDetails, KeyListing, KeyStatus, KeyTranslation, Language, Member,
    MemberRole, MemberStatus, Project, TranslationKey, User,
};
pub use error::{ValidationError, ValidationResult};
pub use filter::{KeyFilter, MemberFilter};
pub use identity::{KeyId, ProjectId, RoleId, Timestamp, UserId};
pub use language::{
    available_languages, merge_languages, normalize_language_code, normalize_languages,
    search_languages,
};
pub use requests::{
    CreateKeyRequest, CreateProjectRequest, InviteMemberRequest, LoginRequest, RegisterRequest,
    UpdateKeyRequest,
};
pub use roles::{role_by_id, role_by_name, role_names, roles, Role};
