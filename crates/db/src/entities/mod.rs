//! Database entities.

pub mod black_list;
pub mod frame;
pub mod galerie;
pub mod galerie_picture;
pub mod galerie_user;
pub mod image;
pub mod invitation;
pub mod like;
pub mod profile_picture;
pub mod ticket;
pub mod user;

pub use black_list::Entity as BlackList;
pub use frame::Entity as Frame;
pub use galerie::Entity as Galerie;
pub use galerie_picture::Entity as GaleriePicture;
pub use galerie_user::Entity as GalerieUser;
pub use image::Entity as Image;
pub use invitation::Entity as Invitation;
pub use like::Entity as Like;
pub use profile_picture::Entity as ProfilePicture;
pub use ticket::Entity as Ticket;
pub use user::Entity as User;
