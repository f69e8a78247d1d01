// SPDX-FileCopyrightText: 2025 stfnw
// SPDX-License-Identifier: MIT

pub mod named;
