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

use crate::base::{BaseType, TexelRank};
use crate::texel::TexelFormat;

/// Stable handle to a [`ShaderType`] owned by a [`crate::TypeRegistry`].
///
/// Two handles compare equal exactly when the registry interned them from the
/// same canonical key, giving the "pointer equality for equal type references"
/// guarantee `spec.md` §8 asks for without threading registry lifetimes
/// through every consumer (`Variable`, `ShaderInfo`, the analyzer's scopes).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) u32);

/// Stable handle to a [`StructType`] owned by a [`crate::TypeRegistry`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructId(pub(crate) u32);

/// `(size_bytes, vec_dims, mat_cols)` payload for `Boolean`/`Signed`/`Unsigned`/`Float`.
///
/// `vec_dims == mat_cols == 1` is a scalar, `mat_cols == 1 && vec_dims > 1` is
/// a vector, `mat_cols > 1` is a matrix (`Float` only).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NumericInfo
{
    pub size_bytes: u8,
    pub vec_dims: u8,
    pub mat_cols: u8
}

impl NumericInfo
{
    pub fn is_scalar(self) -> bool
    {
        self.vec_dims == 1 && self.mat_cols == 1
    }

    pub fn is_vector(self) -> bool
    {
        self.vec_dims > 1 && self.mat_cols == 1
    }

    pub fn is_matrix(self) -> bool
    {
        self.mat_cols > 1
    }
}

/// `{rank, format}` payload for `Sampler`/`Image`/`ROTexels`/`RWTexels`/`SubpassInput`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TexelInfo
{
    pub rank: TexelRank,
    pub format: &'static TexelFormat
}

/// The payload carried by a [`ShaderType`], uniquely determined by its `base_type`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypePayload
{
    /// `Void` carries no payload.
    None,
    Numeric(NumericInfo),
    Texel(TexelInfo),
    /// `Uniform`/`ROBuffer`/`RWBuffer`: the struct backing the buffer's contents.
    Buffer(StructId),
    /// `Struct`: the struct this type names.
    Struct(StructId)
}

/// Complete type information (minus array size) about an object, variable, or
/// expression result. Immutable once interned by the [`crate::TypeRegistry`]
/// that owns it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ShaderType
{
    pub base_type: BaseType,
    pub payload: TypePayload
}

impl ShaderType
{
    pub const VOID: ShaderType = ShaderType { base_type: BaseType::Void, payload: TypePayload::None };

    pub fn numeric(base_type: BaseType, size_bytes: u8, vec_dims: u8, mat_cols: u8) -> Self
    {
        debug_assert!(base_type.is_numeric());
        ShaderType { base_type, payload: TypePayload::Numeric(NumericInfo { size_bytes, vec_dims, mat_cols }) }
    }

    pub fn texel_object(base_type: BaseType, rank: TexelRank, format: &'static TexelFormat) -> Self
    {
        debug_assert!(base_type.is_texel_object());
        ShaderType { base_type, payload: TypePayload::Texel(TexelInfo { rank, format }) }
    }

    pub fn buffer(base_type: BaseType, struct_id: StructId) -> Self
    {
        debug_assert!(base_type.is_buffer_object());
        ShaderType { base_type, payload: TypePayload::Buffer(struct_id) }
    }

    pub fn user_struct(struct_id: StructId) -> Self
    {
        ShaderType { base_type: BaseType::Struct, payload: TypePayload::Struct(struct_id) }
    }

    pub fn is_void(&self) -> bool
    {
        self.base_type == BaseType::Void
    }

    pub fn is_boolean(&self) -> bool
    {
        self.base_type == BaseType::Boolean
    }

    pub fn is_numeric(&self) -> bool
    {
        self.base_type.is_numeric()
    }

    pub fn numeric(&self) -> Option<NumericInfo>
    {
        match self.payload {
            TypePayload::Numeric(n) => Some(n),
            _ => None
        }
    }

    pub fn is_scalar(&self) -> bool
    {
        self.numeric().is_some_and(NumericInfo::is_scalar)
    }

    pub fn is_vector(&self) -> bool
    {
        self.numeric().is_some_and(NumericInfo::is_vector)
    }

    pub fn is_matrix(&self) -> bool
    {
        self.numeric().is_some_and(NumericInfo::is_matrix)
    }

    pub fn texel(&self) -> Option<TexelInfo>
    {
        match self.payload {
            TypePayload::Texel(t) => Some(t),
            _ => None
        }
    }

    pub fn struct_ref(&self) -> Option<StructId>
    {
        match self.payload {
            TypePayload::Buffer(s) | TypePayload::Struct(s) => Some(s),
            _ => None
        }
    }

    /// Number of consecutive interface-table slots (GLSL `location`s) this
    /// type occupies: `matCols` for a matrix, 1 otherwise.
    pub fn binding_count(&self) -> u32
    {
        match self.numeric() {
            Some(n) if n.is_matrix() => n.mat_cols as u32,
            _ => 1
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn numeric_classification()
    {
        let scalar = ShaderType::numeric(BaseType::Float, 4, 1, 1);
        let vector = ShaderType::numeric(BaseType::Float, 4, 3, 1);
        let matrix = ShaderType::numeric(BaseType::Float, 4, 4, 4);
        assert!(scalar.is_scalar());
        assert!(vector.is_vector());
        assert!(matrix.is_matrix());
        assert_eq!(matrix.binding_count(), 4);
        assert_eq!(scalar.binding_count(), 1);
    }
}
