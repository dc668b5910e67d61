pub mod js;
pub mod locale;
pub mod number;
pub mod value;
