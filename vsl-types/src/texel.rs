// Copyright (c) 2021, BlockProject 3D
//
// All rights reserved.
//
// Redistribution and use in source and binary forms, with or without modification,
// are permitted provided that the following conditions are met:
//
//     * Redistributions of source code must retain the above copyright notice,
//       this list of conditions and the following disclaimer.
//     * Redistributions in binary form must reproduce the above copyright notice,
//       this list of conditions and the following disclaimer in the documentation
//       and/or other materials provided with the distribution.
//     * Neither the name of BlockProject 3D nor the names of its contributors
//       may be used to endorse or promote products derived from this software
//       without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS
// "AS IS" AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT
// LIMITED TO, THE IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR
// A PARTICULAR PURPOSE ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT OWNER OR
// CONTRIBUTORS BE LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL,
// EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO,
// PROCUREMENT OF SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR
// PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF
// LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING
// NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE OF THIS
// SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

use crate::base::TexelType;
use phf::phf_map;
use serde::{Deserialize, Serialize};

/// The packed scalar format of a sampled or stored image element.
///
/// The set of valid formats is a closed enumeration named by VSL source text,
/// e.g. `rgba8_unorm`, `rg16_float`. Instances live in a process-wide table
/// (`TEXEL_FORMATS`) and are looked up by name; there is no user extension point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TexelFormat
{
    pub ty: TexelType,
    pub component_size_bytes: u8,
    pub component_count: u8
}

impl TexelFormat
{
    const fn new(ty: TexelType, component_size_bytes: u8, component_count: u8) -> Self
    {
        TexelFormat { ty, component_size_bytes, component_count }
    }

    /// The name this format is spelled with in VSL source, e.g. `rgba8_unorm`.
    pub fn vsl_name(&self) -> &'static str
    {
        TEXEL_FORMATS
            .entries()
            .find(|(_, v)| **v == *self)
            .map(|(k, _)| *k)
            .unwrap_or("unknown")
    }

    /// The GLSL layout qualifier spelling, e.g. `rgba8`.
    pub fn glsl_layout_name(&self) -> String
    {
        let comp = match (self.component_count, self.ty) {
            (1, _) => "r",
            (2, _) => "rg",
            (4, _) => "rgba",
            _ => "r"
        };
        let bits = self.component_size_bytes as u32 * 8;
        let suffix = match self.ty {
            TexelType::Signed => "i",
            TexelType::Unsigned => "ui",
            TexelType::Float if self.component_size_bytes == 4 => "f",
            TexelType::Float => "f",
            TexelType::UNorm => "",
            TexelType::SNorm => "_snorm"
        };
        if self.ty == TexelType::UNorm {
            format!("{comp}{bits}")
        } else {
            format!("{comp}{bits}{suffix}")
        }
    }

    /// The GLSL sampler/image/subpassInput prefix selecting signedness, e.g. `i`/`u`/``.
    pub fn glsl_prefix(&self) -> &'static str
    {
        match self.ty {
            TexelType::Signed => "i",
            TexelType::Unsigned => "u",
            _ => ""
        }
    }
}

static TEXEL_FORMATS: phf::Map<&'static str, TexelFormat> = phf_map! {
    "r8_unorm" => TexelFormat::new(TexelType::UNorm, 1, 1),
    "rg8_unorm" => TexelFormat::new(TexelType::UNorm, 1, 2),
    "rgba8_unorm" => TexelFormat::new(TexelType::UNorm, 1, 4),
    "r8_snorm" => TexelFormat::new(TexelType::SNorm, 1, 1),
    "rg8_snorm" => TexelFormat::new(TexelType::SNorm, 1, 2),
    "rgba8_snorm" => TexelFormat::new(TexelType::SNorm, 1, 4),
    "r8_sint" => TexelFormat::new(TexelType::Signed, 1, 1),
    "rg8_sint" => TexelFormat::new(TexelType::Signed, 1, 2),
    "rgba8_sint" => TexelFormat::new(TexelType::Signed, 1, 4),
    "r8_uint" => TexelFormat::new(TexelType::Unsigned, 1, 1),
    "rg8_uint" => TexelFormat::new(TexelType::Unsigned, 1, 2),
    "rgba8_uint" => TexelFormat::new(TexelType::Unsigned, 1, 4),
    "r16_float" => TexelFormat::new(TexelType::Float, 2, 1),
    "rg16_float" => TexelFormat::new(TexelType::Float, 2, 2),
    "rgba16_float" => TexelFormat::new(TexelType::Float, 2, 4),
    "r16_sint" => TexelFormat::new(TexelType::Signed, 2, 1),
    "rg16_sint" => TexelFormat::new(TexelType::Signed, 2, 2),
    "rgba16_sint" => TexelFormat::new(TexelType::Signed, 2, 4),
    "r16_uint" => TexelFormat::new(TexelType::Unsigned, 2, 1),
    "rg16_uint" => TexelFormat::new(TexelType::Unsigned, 2, 2),
    "rgba16_uint" => TexelFormat::new(TexelType::Unsigned, 2, 4),
    "r32_float" => TexelFormat::new(TexelType::Float, 4, 1),
    "rg32_float" => TexelFormat::new(TexelType::Float, 4, 2),
    "rgba32_float" => TexelFormat::new(TexelType::Float, 4, 4),
    "r32_sint" => TexelFormat::new(TexelType::Signed, 4, 1),
    "rg32_sint" => TexelFormat::new(TexelType::Signed, 4, 2),
    "rgba32_sint" => TexelFormat::new(TexelType::Signed, 4, 4),
    "r32_uint" => TexelFormat::new(TexelType::Unsigned, 4, 1),
    "rg32_uint" => TexelFormat::new(TexelType::Unsigned, 4, 2),
    "rgba32_uint" => TexelFormat::new(TexelType::Unsigned, 4, 4),
};

/// Looks up a texel format by its VSL source spelling (`rgba8_unorm`, ...).
pub fn texel_format(name: &str) -> Option<&'static TexelFormat>
{
    TEXEL_FORMATS.get(name)
}

/// Iterates all closed-enumeration texel format names, for diagnostics/tests.
pub fn texel_format_names() -> impl Iterator<Item = &'static str>
{
    TEXEL_FORMATS.keys().copied()
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn known_format_round_trips_its_name()
    {
        let fmt = texel_format("rgba8_unorm").unwrap();
        assert_eq!(fmt.vsl_name(), "rgba8_unorm");
    }

    #[test]
    fn unknown_format_is_none()
    {
        assert!(texel_format("bogus_format").is_none());
    }

    #[test]
    fn glsl_layout_name_for_float_formats()
    {
        let fmt = texel_format("rgba32_float").unwrap();
        assert_eq!(fmt.glsl_layout_name(), "rgba32f");
    }
}
