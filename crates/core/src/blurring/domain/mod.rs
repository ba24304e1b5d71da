pub mod patch_blurrer;
