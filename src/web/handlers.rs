// SPDX-License-Identifier: GPL-2.0-or-later
pub(crate) mod sounds;
pub(crate) mod status;
