//! Concrete recipes.

pub mod beefy;
pub mod custom;
pub mod plasma;
pub mod transfer;
pub mod uni_v2;
pub mod zero_x;

pub use beefy::BeefyDepositRecipe;
pub use custom::CustomRecipe;
pub use plasma::{PlasmaAction, PlasmaTokenRecipe};
pub use transfer::{TransferRequest, UnshieldMultiTransferRecipe};
pub use uni_v2::UniV2LikeAddLiquidityRecipe;
pub use zero_x::ZeroXSwapRecipe;
