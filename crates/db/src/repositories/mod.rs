//! Database repositories.

pub mod frame;
pub mod galerie;
pub mod image;
pub mod invitation;
pub mod like;
pub mod moderation;
pub mod picture;
pub mod user;

pub use frame::FrameRepository;
pub use galerie::GalerieRepository;
pub use image::ImageRepository;
pub use invitation::InvitationRepository;
pub use like::LikeRepository;
pub use moderation::{BlackListDetach, ModerationRepository};
pub use picture::PictureRepository;
pub use user::UserRepository;
