pub mod certificate_renderer;
pub mod playlist_aggregator;
pub mod preview_image;
pub mod youtube;
