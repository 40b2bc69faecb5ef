pub mod clock;
pub mod event;
pub mod hud;
pub mod jump;
pub mod platforms;
pub mod scene;
pub mod scroll;
pub mod step;
pub mod world;
