//! Quantization table handling
//!
//! A quality factor scales the two base tables into a forward table (8-bit,
//! stored in zigzag order, consumed by the inverse transform) and a reciprocal
//! table (16-bit `0x8000 / q`, natural order, consumed by the forward
//! transform so that quantization is a multiply and a shift).
//!
//! Quality is a quantizer scale: 64 reproduces the base tables, 0 gives the
//! finest table the clamp allows and larger values quantize more coarsely.

use crate::consts::{
    DCTSIZE2, MAX_QUALITY, MAX_QUANT_VALUE, MIN_QUANT_VALUE, STD_CHROMA_QUANT, STD_LUMA_QUANT,
    ZIGZAG,
};
use crate::types::PlaneKind;

/// Quantization tables for a single component
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuantTable {
    /// Quantizer values in zigzag order
    pub forward: [u8; DCTSIZE2],
    /// `0x8000 / value` in natural order
    pub reciprocal: [u16; DCTSIZE2],
}

impl QuantTable {
    /// Scale a base table (natural order) by quality.
    pub fn from_base_table(base: &[u8; DCTSIZE2], quality: u32) -> Self {
        let scale = quality.min(MAX_QUALITY) * 16;

        let mut forward = [0u8; DCTSIZE2];
        let mut reciprocal = [0u16; DCTSIZE2];
        for i in 0..DCTSIZE2 {
            let value = ((base[i] as u32 * scale + 0x200) >> 10)
                .clamp(MIN_QUANT_VALUE, MAX_QUANT_VALUE);

            forward[ZIGZAG[i]] = value as u8;
            reciprocal[i] = (0x8000 / value) as u16;
        }

        Self {
            forward,
            reciprocal,
        }
    }

    /// Standard luminance table at given quality
    pub fn luma(quality: u32) -> Self {
        Self::from_base_table(&STD_LUMA_QUANT, quality)
    }

    /// Standard chrominance table at given quality
    pub fn chroma(quality: u32) -> Self {
        Self::from_base_table(&STD_CHROMA_QUANT, quality)
    }

    /// Quantizer at a natural (row-major) position
    #[inline]
    pub fn at_natural(&self, pos: usize) -> u8 {
        self.forward[ZIGZAG[pos]]
    }
}

/// Quantization table set for Y and the two chroma components
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuantTables {
    /// Quality the tables were derived from (after clamping)
    pub quality: u32,
    /// Luminance tables
    pub luma: QuantTable,
    /// Chrominance tables, shared by U and V
    pub chroma: QuantTable,
}

impl QuantTables {
    /// Derive both table pairs at the given quality.
    pub fn new(quality: u32) -> Self {
        let quality = quality.min(MAX_QUALITY);
        Self {
            quality,
            luma: QuantTable::luma(quality),
            chroma: QuantTable::chroma(quality),
        }
    }

    /// Table used for a plane: luma for Y, chroma for U and V.
    #[inline]
    pub fn for_plane(&self, kind: PlaneKind) -> &QuantTable {
        if kind.is_chroma() {
            &self.chroma
        } else {
            &self.luma
        }
    }
}

impl Default for QuantTables {
    fn default() -> Self {
        Self::new(crate::consts::DEFAULT_QUALITY)
    }
}
