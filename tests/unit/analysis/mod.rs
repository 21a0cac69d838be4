mod slices;
