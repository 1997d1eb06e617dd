// ============================================================
// Layer 4 — Intent Batcher
// ============================================================
// Implements Burn's Batcher trait to stack a Vec<IntentSample>
// into tensors.
//
//   Input:  N samples, each padded to S tokens
//   Output: input_ids [N, S], attention_mask [N, S], labels [N]
//
// All samples are pre-padded by the SequenceEncoder, so the
// flat token buffer can be reshaped directly.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::IntentSample;

#[derive(Debug, Clone)]
pub struct IntentBatch<B: Backend> {
    /// Token ids — [batch_size, seq_len]
    pub input_ids: Tensor<B, 2, Int>,

    /// 1 = real token, 0 = padding — [batch_size, seq_len]
    pub attention_mask: Tensor<B, 2, Int>,

    /// Class index per sample — [batch_size]
    pub labels: Tensor<B, 1, Int>,
}

#[derive(Clone, Debug)]
pub struct IntentBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> IntentBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<IntentSample, IntentBatch<B>> for IntentBatcher<B> {
    fn batch(&self, items: Vec<IntentSample>) -> IntentBatch<B> {
        let batch_size = items.len();
        let seq_len    = items.first().map(|s| s.input_ids.len()).unwrap_or(0);

        let input_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.input_ids.iter().map(|&x| x as i32))
            .collect();

        let mask_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.attention_mask.iter().map(|&x| x as i32))
            .collect();

        let labels: Vec<i32> = items.iter().map(|s| s.label as i32).collect();

        let input_ids = Tensor::<B, 1, Int>::from_ints(
            input_flat.as_slice(), &self.device
        ).reshape([batch_size, seq_len]);

        let attention_mask = Tensor::<B, 1, Int>::from_ints(
            mask_flat.as_slice(), &self.device
        ).reshape([batch_size, seq_len]);

        let labels = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), &self.device);

        IntentBatch { input_ids, attention_mask, labels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_batch_shapes_and_values() {
        let device  = Default::default();
        let batcher = IntentBatcher::<NdArray>::new(device);
        let items = vec![
            IntentSample { input_ids: vec![4, 5, 0], attention_mask: vec![1, 1, 0], label: 1 },
            IntentSample { input_ids: vec![7, 0, 0], attention_mask: vec![1, 0, 0], label: 0 },
        ];

        let batch = batcher.batch(items);
        assert_eq!(batch.input_ids.dims(), [2, 3]);
        assert_eq!(batch.attention_mask.dims(), [2, 3]);
        assert_eq!(batch.labels.dims(), [2]);

        let labels: Vec<i64> = batch.labels.into_data().convert::<i64>().to_vec().unwrap();
        assert_eq!(labels, vec![1, 0]);

        let mask_total: i64 = batch.attention_mask.sum().into_scalar().elem();
        assert_eq!(mask_total, 3);
    }
}
