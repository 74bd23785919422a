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

/// Sizes of the fixed descriptor-set binding tables a stage translation
/// unit declares (`spec.md` §4.6). Referenced by set index: 0 samplers,
/// 1 images, 2 buffer indirection table, 3 RO texel buffers, 4 RW texel
/// buffers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BindingTableSizes
{
    pub num_samplers: u32,
    pub num_images: u32,
    pub num_ro_buffers: u32,
    pub num_rw_buffers: u32,
    pub num_ro_texel_buffers: u32,
    pub num_rw_texel_buffers: u32
}

impl Default for BindingTableSizes
{
    fn default() -> Self
    {
        BindingTableSizes {
            num_samplers: 16,
            num_images: 16,
            num_ro_buffers: 16,
            num_rw_buffers: 16,
            num_ro_texel_buffers: 16,
            num_rw_texel_buffers: 16
        }
    }
}

/// Resolved compilation options threaded from the CLI driver down to the
/// orchestrator, mirroring the teacher's `shaderc/src/options.rs::Args`.
#[derive(Clone, Debug)]
pub struct Config
{
    pub binding_table_sizes: BindingTableSizes,
    pub optimize: bool,
    pub compile_spirv: bool
}

impl Default for Config
{
    fn default() -> Self
    {
        Config { binding_table_sizes: BindingTableSizes::default(), optimize: true, compile_spirv: true }
    }
}
