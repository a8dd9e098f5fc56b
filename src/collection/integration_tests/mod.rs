// Copyright (c) The lazyseq contributors.
// Licensed under the MIT License.

//! Tests for lazy collection behavior

mod construction_test;
mod serialization_test;
