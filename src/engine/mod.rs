// Engine modules: assets, animation

pub mod animation;
pub mod assets;
