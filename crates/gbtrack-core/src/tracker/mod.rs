pub mod berclaz;
pub mod nstage;

pub use berclaz::Berclaz;
pub use nstage::NStage;
