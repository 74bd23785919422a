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

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// The full graphics stage bitmask, ported from `original_source/vsl/ShaderInfo.hpp`'s
    /// `vsl::ShaderStages` (the worked examples in `spec.md` §8 only exercise
    /// Vertex/Fragment, but the source's stage set is five-wide).
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ShaderStages: u16 {
        const VERTEX = 1 << 0;
        const TESS_CONTROL = 1 << 1;
        const TESS_EVAL = 1 << 2;
        const GEOMETRY = 1 << 3;
        const FRAGMENT = 1 << 4;
        const ALL_GRAPHICS = Self::VERTEX.bits() | Self::TESS_CONTROL.bits() | Self::TESS_EVAL.bits()
            | Self::GEOMETRY.bits() | Self::FRAGMENT.bits();
    }
}

impl ShaderStages
{
    /// The ascending bit order in which stages are walked for analysis and
    /// for the artifact's per-stage bytecode array (`spec.md` §6).
    pub const ORDER: [ShaderStages; 5] =
        [ShaderStages::VERTEX, ShaderStages::TESS_CONTROL, ShaderStages::TESS_EVAL, ShaderStages::GEOMETRY, ShaderStages::FRAGMENT];

    pub fn from_source_name(name: &str) -> Option<ShaderStages>
    {
        match name {
            "vert" => Some(ShaderStages::VERTEX),
            "tesc" => Some(ShaderStages::TESS_CONTROL),
            "tese" => Some(ShaderStages::TESS_EVAL),
            "geom" => Some(ShaderStages::GEOMETRY),
            "frag" => Some(ShaderStages::FRAGMENT),
            _ => None
        }
    }

    pub fn source_name(self) -> &'static str
    {
        match self {
            ShaderStages::VERTEX => "vert",
            ShaderStages::TESS_CONTROL => "tesc",
            ShaderStages::TESS_EVAL => "tese",
            ShaderStages::GEOMETRY => "geom",
            ShaderStages::FRAGMENT => "frag",
            _ => "unknown"
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn round_trips_source_name()
    {
        for stage in ShaderStages::ORDER {
            assert_eq!(ShaderStages::from_source_name(stage.source_name()), Some(stage));
        }
    }

    #[test]
    fn all_graphics_contains_every_stage()
    {
        for stage in ShaderStages::ORDER {
            assert!(ShaderStages::ALL_GRAPHICS.contains(stage));
        }
    }
}
