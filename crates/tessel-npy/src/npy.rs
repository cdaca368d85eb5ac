//! Single arrays in `.npy` form.
//!
//! Reading streams elements out of an [`NpyFile`], so a header that
//! claims more data than the stream holds ends in an I/O error rather
//! than an allocation sized by the header.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use npyz::{DType, Deserialize, NpyFile, NpyWriter, Order, Serialize, TypeChar, WriterBuilder};
use tessel_core::{ArrayData, RawArray, SourceError};

/// Elements reserved up front when reading; larger arrays grow as they
/// are read.
const PREALLOC_LIMIT: usize = 1 << 20;

/// Read one array from a `.npy` stream.
///
/// Accepted element types are `bool`, `u8`, `i8`, `i16`, `i32`, `i64`,
/// `f32` and `f64` in either byte order. Booleans become `u8`.
///
/// # Errors
///
/// [`SourceError::Malformed`] for Fortran order or an unaddressable
/// shape, [`SourceError::UnsupportedDtype`] for other element types, and
/// [`SourceError::Io`] for a bad header or a truncated body.
pub fn read_npy<R: Read>(reader: R) -> Result<RawArray, SourceError> {
    from_npy(NpyFile::new(reader)?)
}

/// Open `path` and read the array it holds.
pub fn read_npy_file(path: impl AsRef<Path>) -> Result<RawArray, SourceError> {
    read_npy(BufReader::new(File::open(path)?))
}

pub(crate) fn from_npy<R: Read>(npy: NpyFile<R>) -> Result<RawArray, SourceError> {
    if matches!(npy.order(), Order::Fortran) {
        return Err(malformed("Fortran-ordered arrays are not supported"));
    }
    let shape = npy
        .shape()
        .iter()
        .map(|&d| usize::try_from(d))
        .collect::<Result<Vec<usize>, _>>()
        .map_err(|_| malformed(format!("shape {:?} does not fit in memory", npy.shape())))?;
    let count = shape
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| malformed(format!("shape {shape:?} overflows")))?;

    let type_str = match npy.dtype().clone() {
        DType::Plain(type_str) => type_str,
        other => {
            return Err(SourceError::UnsupportedDtype {
                descr: format!("{other:?}"),
            })
        }
    };
    let data = match (type_str.type_char(), type_str.size_field()) {
        (TypeChar::Bool, 1) => {
            ArrayData::U8(collect::<bool, _>(npy, count)?.into_iter().map(u8::from).collect())
        }
        (TypeChar::Uint, 1) => ArrayData::U8(collect(npy, count)?),
        (TypeChar::Int, 1) => ArrayData::I8(collect(npy, count)?),
        (TypeChar::Int, 2) => ArrayData::I16(collect(npy, count)?),
        (TypeChar::Int, 4) => ArrayData::I32(collect(npy, count)?),
        (TypeChar::Int, 8) => ArrayData::I64(collect(npy, count)?),
        (TypeChar::Float, 4) => ArrayData::F32(collect(npy, count)?),
        (TypeChar::Float, 8) => ArrayData::F64(collect(npy, count)?),
        _ => {
            return Err(SourceError::UnsupportedDtype {
                descr: type_str.to_string(),
            })
        }
    };
    RawArray::new(&shape, data).map_err(|e| malformed(e.to_string()))
}

fn collect<T: Deserialize, R: Read>(npy: NpyFile<R>, count: usize) -> Result<Vec<T>, SourceError> {
    let elements = npy.data::<T>().map_err(|e| SourceError::UnsupportedDtype {
        descr: e.to_string(),
    })?;
    let mut out = Vec::with_capacity(count.min(PREALLOC_LIMIT));
    for element in elements {
        out.push(element?);
    }
    Ok(out)
}

/// Write every element of `data` through a configured `npyz` builder.
///
/// `$options` is evaluated once, in the arm matching the element type.
macro_rules! write_data {
    ($options:expr, $shape:expr, $data:expr) => {
        match $data {
            ArrayData::U8(v) => finish::<u8, _>($options.default_dtype().shape($shape).begin_nd()?, v),
            ArrayData::I8(v) => finish::<i8, _>($options.default_dtype().shape($shape).begin_nd()?, v),
            ArrayData::I16(v) => {
                finish::<i16, _>($options.default_dtype().shape($shape).begin_nd()?, v)
            }
            ArrayData::I32(v) => {
                finish::<i32, _>($options.default_dtype().shape($shape).begin_nd()?, v)
            }
            ArrayData::I64(v) => {
                finish::<i64, _>($options.default_dtype().shape($shape).begin_nd()?, v)
            }
            ArrayData::F32(v) => {
                finish::<f32, _>($options.default_dtype().shape($shape).begin_nd()?, v)
            }
            ArrayData::F64(v) => {
                finish::<f64, _>($options.default_dtype().shape($shape).begin_nd()?, v)
            }
        }
    };
}
pub(crate) use write_data;

pub(crate) fn finish<T: Serialize + Copy, W: Write>(
    mut writer: NpyWriter<T, W>,
    values: &[T],
) -> io::Result<()> {
    writer.extend(values.iter().copied())?;
    writer.finish()
}

pub(crate) fn shape_u64(array: &RawArray) -> Vec<u64> {
    array.dims().iter().map(|&d| d as u64).collect()
}

/// Write `array` as a C-ordered `.npy` stream.
pub fn write_npy<W: Write>(writer: W, array: &RawArray) -> Result<(), SourceError> {
    let shape = shape_u64(array);
    write_data!(
        npyz::WriteOptions::new().writer(writer),
        &shape,
        array.data()
    )?;
    Ok(())
}

/// Create (or truncate) `path` and write `array` to it.
pub fn write_npy_file(path: impl AsRef<Path>, array: &RawArray) -> Result<(), SourceError> {
    write_npy(BufWriter::new(File::create(path)?), array)
}

pub(crate) fn malformed(detail: impl Into<String>) -> SourceError {
    SourceError::Malformed {
        detail: detail.into(),
    }
}
