mod acquisition;
mod telemetry;
mod trimming;
