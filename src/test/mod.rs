mod support;

mod clock;
