/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Single object upload
pub mod upload;

/// Single object deletion
pub mod delete;

/// Bucket access and content verification
pub mod verify;
