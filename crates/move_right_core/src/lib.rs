pub mod domain;
pub mod pose;
pub mod ports;
pub mod validation;
pub mod workout;

pub use domain::{
    AuthSession, Exercise, FormAssessment, FormVerdict, MediaItem, RepDetail, Review, User,
    UserCredentials, WorkoutResult,
};
pub use ports::{DatabaseService, FormClassifierService, NewUser, PortError, PortResult, UserPatch};
