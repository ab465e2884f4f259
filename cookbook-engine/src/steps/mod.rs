//! Concrete steps.

pub mod approve;
pub mod beefy;
pub mod plasma;
pub mod railgun;
pub mod transfer;
pub mod uni_v2;
pub mod wrap;
pub mod zero_x;

pub use approve::ApproveERC20SpenderStep;
pub use beefy::{BeefyDepositStep, BeefyVaultData};
pub use plasma::{DepositPlasmaTokenStep, WithdrawPlasmaTokenStep};
pub use railgun::{ShieldDefaultStep, UnshieldDefaultStep};
pub use transfer::{ERC20Transfer, TransferERC20Step, TransferERC20TokenMultiStep};
pub use uni_v2::UniV2LikeAddLiquidityStep;
pub use wrap::{UnwrapBaseTokenStep, WrapBaseTokenStep};
pub use zero_x::ZeroXSwapStep;
