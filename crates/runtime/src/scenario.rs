use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use kernels::{DType, Element, Tensor};
use serde::{Deserialize, Serialize};

/// Tensors for one fill run, as given on the command line or in a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub dims: Vec<i64>,
    #[serde(default = "default_dims_type")]
    pub dims_type: String,
    pub value: serde_json::Value,
    pub dtype: String,
    #[serde(default)]
    pub output_shape: Option<Vec<usize>>,
}

fn default_dims_type() -> String {
    DType::I32.to_string()
}

impl Scenario {
    pub const DIMS: usize = 0;
    pub const VALUE: usize = 1;
    pub const OUTPUT: usize = 2;

    /// Reads a JSON scenario file.
    ///
    /// # Errors
    /// Fails if the file cannot be read or is not a valid scenario.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing scenario {}", path.display()))
    }

    /// Builds the dims, value and output tensors, in that order.
    ///
    /// # Errors
    /// Fails on an unknown dtype name, a dim or value that does not fit its
    /// type, or an output shape that cannot be allocated.
    pub fn tensors(&self) -> Result<Vec<Tensor>> {
        let dims_type: DType = self.dims_type.parse()?;
        let dtype: DType = self.dtype.parse()?;

        let dims = encode_dims(dims_type, &self.dims)?;
        let value = parse_scalar(dtype, &value_text(&self.value)?)?;
        let output_shape = match &self.output_shape {
            Some(shape) => shape.clone(),
            None => self
                .dims
                .iter()
                .map(|&d| usize::try_from(d))
                .collect::<Result<Vec<_>, _>>()
                .context("cannot commit an output shape with negative dims; pass --output-shape")?,
        };
        let output = Tensor::zeros(dtype, output_shape)?;
        Ok(vec![dims, value, output])
    }
}

fn value_text(value: &serde_json::Value) -> Result<String> {
    match value {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        other => bail!("fill value must be a number, bool or string, got {other}"),
    }
}

fn encode<T>(dims: &[i64]) -> Result<Tensor>
where
    T: Element + TryFrom<i64>,
{
    let values = dims
        .iter()
        .map(|&d| T::try_from(d).map_err(|_| anyhow!("dimension {d} does not fit in {}", T::DTYPE)))
        .collect::<Result<Vec<T>>>()?;
    Ok(Tensor::from_slice(vec![values.len()], &values)?)
}

/// Packs `dims` into a rank-1 tensor of `dims_type`.
///
/// # Errors
/// Fails if `dims_type` is not a signed integer type or a dim is out of its
/// range.
pub fn encode_dims(dims_type: DType, dims: &[i64]) -> Result<Tensor> {
    match dims_type {
        DType::I8 => encode::<i8>(dims),
        DType::I16 => encode::<i16>(dims),
        DType::I32 => encode::<i32>(dims),
        DType::I64 => encode::<i64>(dims),
        other => bail!("dims must be stored as i8, i16, i32 or i64, not {other}"),
    }
}

fn parse<T>(text: &str) -> Result<Tensor>
where
    T: Element + std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = text
        .trim()
        .parse::<T>()
        .with_context(|| format!("parsing {text:?} as {}", T::DTYPE))?;
    Ok(Tensor::scalar(value))
}

/// Parses `text` into a rank-0 tensor of `dtype`.
///
/// # Errors
/// Fails if `text` is not a valid literal for `dtype`.
pub fn parse_scalar(dtype: DType, text: &str) -> Result<Tensor> {
    match dtype {
        DType::I8 => parse::<i8>(text),
        DType::I16 => parse::<i16>(text),
        DType::I32 => parse::<i32>(text),
        DType::I64 => parse::<i64>(text),
        DType::U8 => parse::<u8>(text),
        DType::U16 => parse::<u16>(text),
        DType::U32 => parse::<u32>(text),
        DType::U64 => parse::<u64>(text),
        DType::F32 => parse::<f32>(text),
        DType::F64 => parse::<f64>(text),
        DType::Bool => {
            let flag: bool = text
                .trim()
                .parse()
                .with_context(|| format!("parsing {text:?} as bool"))?;
            Ok(Tensor::new(DType::Bool, Vec::new(), vec![u8::from(flag)])?)
        }
    }
}

/// Shape, dtype and elements of `tensor` as JSON.
///
/// # Errors
/// Fails if the buffer cannot be read as `tensor`'s element type.
pub fn output_json(tensor: &Tensor) -> Result<serde_json::Value> {
    let values = match tensor.dtype() {
        DType::I8 => serde_json::to_value(tensor.to_vec::<i8>()?)?,
        DType::I16 => serde_json::to_value(tensor.to_vec::<i16>()?)?,
        DType::I32 => serde_json::to_value(tensor.to_vec::<i32>()?)?,
        DType::I64 => serde_json::to_value(tensor.to_vec::<i64>()?)?,
        DType::U8 => serde_json::to_value(tensor.to_vec::<u8>()?)?,
        DType::U16 => serde_json::to_value(tensor.to_vec::<u16>()?)?,
        DType::U32 => serde_json::to_value(tensor.to_vec::<u32>()?)?,
        DType::U64 => serde_json::to_value(tensor.to_vec::<u64>()?)?,
        DType::F32 => serde_json::to_value(tensor.to_vec::<f32>()?)?,
        DType::F64 => serde_json::to_value(tensor.to_vec::<f64>()?)?,
        DType::Bool => serde_json::to_value(
            tensor.as_bytes().iter().map(|&b| b != 0).collect::<Vec<bool>>(),
        )?,
    };
    Ok(serde_json::json!({
        "shape": tensor.shape(),
        "dtype": tensor.dtype().as_str(),
        "values": values,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(dims: Vec<i64>, dims_type: &str, value: serde_json::Value, dtype: &str) -> Scenario {
        Scenario {
            dims,
            dims_type: dims_type.to_string(),
            value,
            dtype: dtype.to_string(),
            output_shape: None,
        }
    }

    #[test]
    fn builds_tensors_in_binding_order() {
        let tensors = scenario(vec![3, 8], "i32", serde_json::json!(-42), "i8")
            .tensors()
            .unwrap();
        assert_eq!(tensors[Scenario::DIMS].to_vec::<i32>().unwrap(), vec![3, 8]);
        assert_eq!(tensors[Scenario::VALUE].to_vec::<i8>().unwrap(), vec![-42]);
        assert_eq!(tensors[Scenario::OUTPUT].shape(), &[3, 8]);
        assert_eq!(tensors[Scenario::OUTPUT].dtype(), DType::I8);
    }

    #[test]
    fn parses_json_file_contents() {
        let parsed: Scenario = serde_json::from_str(
            r#"{"dims": [2, 2, 2], "dims_type": "i64", "value": 4.0, "dtype": "f32"}"#,
        )
        .unwrap();
        assert_eq!(parsed.dims, vec![2, 2, 2]);
        assert_eq!(parsed.output_shape, None);
        let tensors = parsed.tensors().unwrap();
        assert_eq!(tensors[Scenario::DIMS].dtype(), DType::I64);
        assert_eq!(tensors[Scenario::VALUE].to_vec::<f32>().unwrap(), vec![4.0]);
    }

    #[test]
    fn defaults_to_scalar_with_i32_dims() {
        let parsed: Scenario = serde_json::from_str(r#"{"value": "true", "dtype": "bool"}"#).unwrap();
        let tensors = parsed.tensors().unwrap();
        assert_eq!(tensors[Scenario::DIMS].dtype(), DType::I32);
        assert_eq!(tensors[Scenario::DIMS].shape(), &[0]);
        assert_eq!(tensors[Scenario::VALUE].as_bytes(), &[1]);
        assert!(tensors[Scenario::OUTPUT].shape().is_empty());
    }

    #[test]
    fn dims_out_of_range_for_type() {
        let err = encode_dims(DType::I8, &[300]).unwrap_err();
        assert!(err.to_string().contains("does not fit in i8"), "{err}");
        assert!(encode_dims(DType::F32, &[1]).is_err());
    }

    #[test]
    fn negative_dims_need_an_explicit_output_shape() {
        let mut s = scenario(vec![-1, 2], "i16", serde_json::json!(1), "i32");
        assert!(s.tensors().is_err());
        s.output_shape = Some(vec![1, 2]);
        assert!(s.tensors().is_ok());
    }

    #[test]
    fn rejects_unparsable_values() {
        assert!(parse_scalar(DType::U8, "-1").is_err());
        assert!(parse_scalar(DType::Bool, "yes").is_err());
        assert!(value_text(&serde_json::json!([1])).is_err());
    }

    #[test]
    fn output_json_reports_shape_and_values() {
        let tensor = Tensor::from_slice(vec![1, 2], &[4.0f32, 4.0]).unwrap();
        assert_eq!(
            output_json(&tensor).unwrap(),
            serde_json::json!({"shape": [1, 2], "dtype": "f32", "values": [4.0, 4.0]})
        );
    }

    #[test]
    fn load_reports_the_missing_path() {
        let err = Scenario::load(Path::new("no/such/scenario.json")).unwrap_err();
        assert!(err.to_string().contains("no/such/scenario.json"), "{err}");
    }

    #[test]
    fn unallocatable_output_shape_is_an_error() {
        let mut s = scenario(vec![1, 1], "i64", serde_json::json!(1), "i8");
        s.output_shape = Some(vec![usize::MAX, 2]);
        assert!(s.tensors().is_err());
    }
}
