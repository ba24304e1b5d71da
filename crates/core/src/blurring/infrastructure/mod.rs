pub mod stack_blurrer;
