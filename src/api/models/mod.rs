// Models module - contains Diagram, Bone, user payloads and enums

pub mod bone;
pub mod diagram;
pub mod enums;
pub mod user;

pub use bone::{Bone, BoneInput, BoneRecord};
pub use diagram::{
    CreateDiagramRequest, DeleteDiagramResponse, Diagram, DiagramRecord, StoredDiagram,
    UpdateDiagramRequest,
};
pub use enums::DiagramStatus;
pub use user::{LoginForm, SignupRequest, SignupResponse, TokenResponse, User, UserRecord};
