use crate::*;
use candle_core::D;
use candle_core::Module;
use candle_core::Tensor;
use candle_nn::Init;
use candle_nn::VarBuilder;

/// Layer normalization over the last dimension with a learned
/// scale `gamma` and shift `beta`.
///
/// Built from plain tensor ops so that it stays differentiable on every
/// backend.
#[derive(Debug, Clone)]
pub struct Norm {
    gamma: Tensor,
    beta: Tensor,
}

impl Norm {
    pub fn new(size: usize, vb: VarBuilder) -> candle_core::Result<Self> {
        Ok(Self {
            gamma: vb.get_with_hints(size, "gamma", Init::Const(1.))?,
            beta: vb.get_with_hints(size, "beta", Init::Const(0.))?,
        })
    }
}

impl Module for Norm {
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let centered = xs.broadcast_sub(&xs.mean_keepdim(D::Minus1)?)?;
        let variance = centered.sqr()?.mean_keepdim(D::Minus1)?;
        let scale = (variance + LAYER_NORM_EPSILON)?.sqrt()?;
        centered
            .broadcast_div(&scale)?
            .broadcast_mul(&self.gamma)?
            .broadcast_add(&self.beta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::DType;
    use candle_core::Device;
    use candle_nn::VarMap;

    #[test]
    fn rows_are_standardized() {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let norm = Norm::new(4, vb).unwrap();
        let xs = Tensor::new(&[[1f32, 2., 3., 4.], [-8., 0., 0., 8.]], &Device::Cpu).unwrap();
        for row in norm.forward(&xs).unwrap().to_vec2::<f32>().unwrap() {
            let mean = row.iter().sum::<f32>() / 4.;
            let var = row.iter().map(|x| (x - mean).powi(2)).sum::<f32>() / 4.;
            assert!(mean.abs() < 1e-5);
            assert!((var - 1.).abs() < 1e-3);
        }
    }
}
