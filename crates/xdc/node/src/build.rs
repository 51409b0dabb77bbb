//! XDC block assembler.
//!
//! Builds the final sealed block from the executed transactions, receipts
//! and state root computed by the EVM pipeline. XDC blocks carry a standard
//! Ethereum body; the only chain-specific knob here is EIP-158 state clear,
//! which is handled upstream in [`crate::evm`] and doesn't affect assembly.

use std::sync::Arc;

use alloy_consensus::{proofs, Block, BlockBody, Header};
use alloy_evm::{
    block::{BlockAssembler, BlockAssemblerInput},
    eth::EthBlockExecutorFactory,
};
use reth_chainspec::{EthChainSpec, EthereumHardforks};
use reth_ethereum_primitives::TransactionSigned;
use reth_evm::execute::BlockExecutionError;

use crate::receipt::XdcReceiptBuilder;

/// Assembles [`Block`]s for XDC chains from the output of [`XdcEvmConfig`](crate::evm::XdcEvmConfig).
#[derive(Debug, Clone)]
pub struct XdcBlockAssembler<ChainSpec> {
    /// Chain specification, used for fork-gated header fields (e.g. EIP-4895 withdrawals root).
    pub chain_spec: Arc<ChainSpec>,
}

impl<ChainSpec> XdcBlockAssembler<ChainSpec> {
    /// Create a new block assembler for `chain_spec`.
    pub fn new(chain_spec: Arc<ChainSpec>) -> Self {
        Self { chain_spec }
    }
}

impl<ChainSpec, EvmFactory> BlockAssembler<EthBlockExecutorFactory<XdcReceiptBuilder, Arc<ChainSpec>, EvmFactory>>
    for XdcBlockAssembler<ChainSpec>
where
    ChainSpec: EthChainSpec + EthereumHardforks,
    EvmFactory: alloy_evm::EvmFactory,
{
    type Block = Block<TransactionSigned>;

    fn assemble_block(
        &self,
        input: BlockAssemblerInput<
            '_,
            '_,
            EthBlockExecutorFactory<XdcReceiptBuilder, Arc<ChainSpec>, EvmFactory>,
        >,
    ) -> Result<Self::Block, BlockExecutionError> {
        let BlockAssemblerInput {
            evm_env, execution_ctx: ctx, parent, transactions, output, state_root, ..
        } = input;

        let timestamp = evm_env.block_env.timestamp.saturating_to();
        let number = evm_env.block_env.number.saturating_to();

        let transactions_root = proofs::calculate_transaction_root(&transactions);
        let receipts_root =
            alloy_consensus::proofs::calculate_receipt_root(&output.receipts);
        let ommers_root = proofs::calculate_ommers_root(ctx.ommers);

        let withdrawals_root = ctx.withdrawals.as_ref().map(|w| proofs::calculate_withdrawals_root(w));

        let header = Header {
            parent_hash: ctx.parent_hash,
            ommers_hash: ommers_root,
            beneficiary: evm_env.block_env.beneficiary,
            state_root,
            transactions_root,
            receipts_root,
            logs_bloom: output.receipts.iter().fold(Default::default(), |bloom, receipt| {
                bloom | receipt.bloom_slow()
            }),
            difficulty: evm_env.block_env.difficulty,
            number,
            gas_limit: evm_env.block_env.gas_limit,
            gas_used: output.gas_used,
            timestamp,
            extra_data: ctx.extra_data.clone(),
            mix_hash: evm_env.block_env.prevrandao.unwrap_or_default(),
            nonce: Default::default(),
            base_fee_per_gas: Some(evm_env.block_env.basefee),
            withdrawals_root,
            blob_gas_used: None,
            excess_blob_gas: None,
            parent_beacon_block_root: ctx.parent_beacon_block_root,
            requests_hash: None,
        };

        Ok(Block {
            header,
            body: BlockBody {
                transactions,
                ommers: ctx.ommers.to_vec(),
                withdrawals: ctx.withdrawals.map(|w| w.into_owned()),
            },
        })
    }
}
